//! One play session: engine, world settings, clock and the objects that
//! consume it, advanced frame by frame.

use std::rc::{Rc, Weak};
use std::sync::Arc;

use masstime_config::MassTimeConfig;
use masstime_core::host::{MassSimulation, WorldSettings};
use masstime_core::time::{ClockSettings, SimClock, DILATION_FLOOR};
use masstime_telemetry::MetricsRecorder;
use tracing::{info, instrument, trace};

use crate::actor::RealTimeActor;
use crate::controller::PlayerController;
use crate::error::SimulatorError;
use crate::mass::LocalMassSimulation;
use crate::widget::SimControlPanel;
use crate::world::LocalWorldSettings;

pub struct Session {
    engine: Rc<LocalMassSimulation>,
    world: Rc<LocalWorldSettings>,
    clock: Rc<SimClock>,
    panel: Rc<SimControlPanel>,
    actor: Rc<RealTimeActor>,
    controller: PlayerController,
    metrics: Option<Arc<MetricsRecorder>>,
    frames: u64,
    real_elapsed: f64,
    closed: bool,
}

impl Session {
    /// Brings up the session in the same order a game world would: engine
    /// and world settings first, then the clock, then its consumers.
    #[instrument(skip_all)]
    pub fn new(config: &MassTimeConfig) -> Result<Self, SimulatorError> {
        let metrics = if config.telemetry.metrics {
            Some(Arc::new(MetricsRecorder::new()?))
        } else {
            None
        };

        let engine = Rc::new(LocalMassSimulation::new(false));
        let world = Rc::new(LocalWorldSettings::from_config(&config.world));

        let clock = SimClock::initialize(
            ClockSettings {
                speed_options: config.sim_time.speed_options.clone(),
                initial_dilation: config.sim_time.initial_dilation,
                metrics: metrics.clone(),
            },
            Rc::downgrade(&engine) as Weak<dyn MassSimulation>,
            Rc::downgrade(&world) as Weak<dyn WorldSettings>,
        );

        let panel = SimControlPanel::construct(&clock, &config.widget);
        let actor = RealTimeActor::begin_play(&clock);
        let controller = PlayerController::new(&clock, &config.controller);

        info!(
            steps = clock.speed_count(),
            dilation = clock.dilation(),
            "Session started"
        );

        Ok(Self {
            engine,
            world,
            clock,
            panel,
            actor,
            controller,
            metrics,
            frames: 0,
            real_elapsed: 0.0,
            closed: false,
        })
    }

    /// Runs one host frame of `real_delta` wall-clock seconds.
    ///
    /// The engine reaches its safe point first, so pause requests made
    /// during the previous frame are confirmed before the clock ticks.
    pub fn advance_frame(&mut self, real_delta: f32) {
        self.engine.process_pending();

        let dilated_delta = real_delta * self.world.time_dilation().max(DILATION_FLOOR);
        self.clock.tick(dilated_delta);
        self.panel.tick(dilated_delta);
        self.controller.tick(dilated_delta);

        self.frames += 1;
        self.real_elapsed += f64::from(real_delta);
        trace!(frame = self.frames, dilated_delta, "Frame advanced");
    }

    /// Releases every subscription in reverse order of creation.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.panel.destruct();
        self.actor.end_play();
        self.clock.deinitialize();
        info!(frames = self.frames, "Session closed");
    }

    pub fn clock(&self) -> &Rc<SimClock> {
        &self.clock
    }

    pub fn engine(&self) -> &LocalMassSimulation {
        &self.engine
    }

    pub fn world(&self) -> &LocalWorldSettings {
        &self.world
    }

    pub fn panel(&self) -> &SimControlPanel {
        &self.panel
    }

    pub fn actor(&self) -> &RealTimeActor {
        &self.actor
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlayerController {
        &mut self.controller
    }

    pub fn metrics(&self) -> Option<&MetricsRecorder> {
        self.metrics.as_deref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn real_elapsed(&self) -> f64 {
        self.real_elapsed
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masstime_core::events::ClockEvent;

    fn session() -> Session {
        Session::new(&MassTimeConfig::default()).unwrap()
    }

    #[test]
    fn starts_at_configured_dilation() {
        let session = session();
        assert_eq!(session.clock().dilation(), 1.0);
        assert_eq!(session.clock().speed_index(), 4);
        assert_eq!(session.world().time_dilation(), 1.0);
        assert_eq!(session.engine().subscriber_count(), 1);
    }

    #[test]
    fn frames_tick_with_dilated_delta() {
        let mut session = session();
        session.clock().increase_sim_speed().unwrap();
        session.advance_frame(0.1);

        assert_eq!(session.clock().tick_number(), 1);
        assert!((session.clock().delta_time() - 0.125).abs() < 1e-6);
        assert!((session.real_elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn pause_is_confirmed_on_next_frame() {
        let mut session = session();
        session.controller().toggle_play_pause().unwrap();
        assert!(!session.clock().is_paused());

        session.advance_frame(0.1);
        assert!(session.clock().is_paused());
        assert_eq!(session.clock().tick_number(), 0);
        assert_eq!(session.panel().view().pause_label, "Resume");
    }

    #[test]
    fn forced_non_positive_dilation_keeps_time_moving_forward() {
        let mut session = session();
        session.advance_frame(0.1);
        session.world().force_time_dilation(-1.0);

        for _ in 0..10 {
            let before = session.clock().elapsed_time();
            session.advance_frame(0.1);
            assert!(session.clock().elapsed_time() >= before);
            assert!(session.clock().delta_time() >= 0.0);
        }
        assert_eq!(session.clock().tick_number(), 11);
        assert_eq!(session.clock().dilation(), DILATION_FLOOR);
    }

    #[test]
    fn shutdown_releases_all_subscriptions() {
        let mut session = session();
        session.shutdown();
        session.shutdown();

        assert_eq!(session.engine().subscriber_count(), 0);
        let notifier = session.clock().notifier();
        assert_eq!(notifier.subscriber_count(ClockEvent::DilationChanged), 0);
        assert_eq!(notifier.subscriber_count(ClockEvent::PauseChanged), 0);
    }

    #[test]
    fn metrics_are_recorded_when_enabled() {
        let mut config = MassTimeConfig::default();
        config.telemetry.metrics = true;
        let mut session = Session::new(&config).unwrap();
        session.advance_frame(0.016);

        let text = session.metrics().unwrap().gather_metrics().unwrap();
        assert!(text.contains("masstime_ticks_total 1"));
    }
}

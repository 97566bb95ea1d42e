use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use masstime_telemetry::{EventLogger, MetricsRecorder};
use tracing::{debug, error, info, instrument, trace};

use super::ladder::{SpeedLadder, DILATION_FLOOR};
use crate::bridge::PauseBridge;
use crate::error::TimeControlError;
use crate::events::{ChangeNotifier, ClockEvent, SubscriberId};
use crate::host::{EngineCallback, MassSimulation, WorldSettings};

/// Speed steps used when nothing is configured.
pub const DEFAULT_SPEED_OPTIONS: [f32; 10] = [0.125, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 4.0, 8.0];

#[derive(Debug, Clone)]
pub struct ClockSettings {
    pub speed_options: Vec<f32>,
    pub initial_dilation: f32,
    pub metrics: Option<Arc<MetricsRecorder>>,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            speed_options: DEFAULT_SPEED_OPTIONS.to_vec(),
            initial_dilation: 1.0,
            metrics: None,
        }
    }
}

/// Result of a pause or resume request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Already in the requested state; nothing was sent.
    Unchanged,
    /// Delivered to the engine. The state flips once the engine confirms.
    Requested,
}

#[derive(Debug)]
struct SharedClockState {
    paused: AtomicBool,
    dilation_bits: AtomicU32,
}

impl SharedClockState {
    fn dilation(&self) -> f32 {
        f32::from_bits(self.dilation_bits.load(Ordering::Acquire))
    }

    fn store_dilation(&self, dilation: f32) {
        self.dilation_bits
            .store(dilation.to_bits(), Ordering::Release);
    }
}

/// Read-only view of the clock that may be moved to another thread.
#[derive(Debug, Clone)]
pub struct ClockReader {
    shared: Arc<SharedClockState>,
}

impl ClockReader {
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    pub fn dilation(&self) -> f32 {
        self.shared.dilation()
    }

    pub fn real_dilation(&self) -> f32 {
        1.0 / self.dilation()
    }

    pub fn real_time_seconds(&self, dilated_seconds: f32) -> f32 {
        dilated_seconds / self.dilation()
    }
}

/// Authoritative simulated time for one session.
///
/// Lives on the game thread behind an `Rc`. Every method takes `&self`, so
/// subscribers handed `&SimClock` during a broadcast may issue further
/// commands.
pub struct SimClock {
    id: SubscriberId,
    shared: Arc<SharedClockState>,
    delta_time: Cell<f32>,
    elapsed: Cell<f64>,
    tick_count: Cell<u64>,
    ladder: RefCell<SpeedLadder>,
    bridge: PauseBridge,
    world: Weak<dyn WorldSettings>,
    notifier: ChangeNotifier<SimClock>,
    metrics: Option<Arc<MetricsRecorder>>,
    subscribed: Cell<bool>,
}

impl SimClock {
    /// Builds the clock and hooks it up to the engine's pause notifications.
    ///
    /// The configured ladder is sorted and pruned against the world's global
    /// dilation range. If nothing survives, the initial dilation becomes the
    /// only step. The clock then adopts the ladder value closest to (and not
    /// above) the initial dilation and writes it to the world.
    ///
    /// The initial pause state is read from the engine. A missing engine is
    /// logged and the clock starts running without engine notifications.
    #[instrument(skip_all, fields(options = settings.speed_options.len()))]
    pub fn initialize(
        settings: ClockSettings,
        engine: Weak<dyn MassSimulation>,
        world: Weak<dyn WorldSettings>,
    ) -> Rc<Self> {
        let ClockSettings {
            speed_options,
            initial_dilation,
            metrics,
        } = settings;

        let mut dilation = initial_dilation.max(DILATION_FLOOR);
        let mut ladder = SpeedLadder::new(speed_options);

        match world.upgrade() {
            Some(world_settings) => {
                let min = world_settings.min_global_time_dilation().max(DILATION_FLOOR);
                let max = world_settings.max_global_time_dilation();
                ladder.prune_to_range(min, max);
            }
            None => error!("World settings unavailable; speed options were not range checked"),
        }

        ladder.ensure_non_empty(dilation);
        if let Some(value) = ladder.snap_to(dilation) {
            dilation = value;
        }

        if let Some(world_settings) = world.upgrade() {
            world_settings.set_time_dilation(dilation);
        }

        let bridge = PauseBridge::new(engine);
        let paused = match bridge.is_simulation_paused() {
            Ok(paused) => paused,
            Err(e) => {
                error!("Cannot read initial pause state: {e}");
                false
            }
        };

        let clock = Rc::new(Self {
            id: SubscriberId::next(),
            shared: Arc::new(SharedClockState {
                paused: AtomicBool::new(paused),
                dilation_bits: AtomicU32::new(dilation.to_bits()),
            }),
            delta_time: Cell::new(0.0),
            elapsed: Cell::new(0.0),
            tick_count: Cell::new(0),
            ladder: RefCell::new(ladder),
            bridge,
            world,
            notifier: ChangeNotifier::new(),
            metrics,
            subscribed: Cell::new(false),
        });

        if let Some(metrics) = &clock.metrics {
            metrics.set_time_dilation(dilation);
        }

        let on_paused: EngineCallback = {
            let weak = Rc::downgrade(&clock);
            Box::new(move || {
                if let Some(clock) = weak.upgrade() {
                    clock.on_external_pause_confirmed();
                }
            })
        };
        let on_resumed: EngineCallback = {
            let weak = Rc::downgrade(&clock);
            Box::new(move || {
                if let Some(clock) = weak.upgrade() {
                    clock.on_external_resume_confirmed();
                }
            })
        };

        match clock.bridge.subscribe(clock.id, on_paused, on_resumed) {
            Ok(()) => clock.subscribed.set(true),
            Err(e) => error!("Mass simulation is required for pause notifications: {e}"),
        }

        info!(
            paused,
            dilation,
            index = clock.speed_index(),
            steps = clock.speed_count(),
            "Sim clock initialized"
        );
        clock
    }

    /// Releases the engine subscription and drops every clock subscriber.
    /// Safe to call more than once.
    pub fn deinitialize(&self) {
        if self.subscribed.replace(false) {
            if let Err(e) = self.bridge.unsubscribe(self.id) {
                debug!("Engine already gone at teardown: {e}");
            }
        }
        self.notifier.clear();
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn notifier(&self) -> &ChangeNotifier<SimClock> {
        &self.notifier
    }

    pub fn reader(&self) -> ClockReader {
        ClockReader {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn request_pause(&self) -> Result<RequestOutcome, TimeControlError> {
        if self.is_paused() {
            return Ok(RequestOutcome::Unchanged);
        }
        self.bridge.pause()?;
        info!("Pause simulation requested");
        Ok(RequestOutcome::Requested)
    }

    pub fn request_resume(&self) -> Result<RequestOutcome, TimeControlError> {
        if !self.is_paused() {
            return Ok(RequestOutcome::Unchanged);
        }
        self.bridge.resume()?;
        info!("Resume simulation requested");
        Ok(RequestOutcome::Requested)
    }

    pub fn toggle_play_pause(&self) -> Result<RequestOutcome, TimeControlError> {
        if self.is_paused() {
            self.request_resume()
        } else {
            self.request_pause()
        }
    }

    pub fn on_external_pause_confirmed(&self) {
        self.shared.paused.store(true, Ordering::Release);
        debug!("Mass simulation paused");
        self.notify(ClockEvent::PauseChanged);
    }

    pub fn on_external_resume_confirmed(&self) {
        self.shared.paused.store(false, Ordering::Release);
        debug!("Mass simulation resumed");
        self.notify(ClockEvent::ResumeChanged);
    }

    /// Advances the clock by one host tick, then reconciles the dilation
    /// with the world register.
    ///
    /// # Panics
    ///
    /// Panics if the world settings have been dropped. The host owns them for
    /// the whole session, so this is a lifecycle bug.
    pub fn tick(&self, delta_time: f32) {
        if self.is_paused() {
            self.delta_time.set(0.0);
        } else {
            self.delta_time.set(delta_time);
            self.elapsed
                .set(self.elapsed.get() + f64::from(delta_time));
            self.tick_count.set(self.tick_count.get() + 1);
            if let Some(metrics) = &self.metrics {
                metrics.inc_ticks();
            }
        }
        trace!(
            tick = self.tick_count.get(),
            delta = self.delta_time.get(),
            "Sim clock tick"
        );

        let world = self
            .world
            .upgrade()
            .expect("world settings must outlive the sim clock");
        let external = world.time_dilation().max(DILATION_FLOOR);
        if external != self.dilation() {
            self.resync_dilation(external);
        }
    }

    pub fn increase_sim_speed(&self) -> Result<f32, TimeControlError> {
        self.step_speed(true)
    }

    pub fn decrease_sim_speed(&self) -> Result<f32, TimeControlError> {
        self.step_speed(false)
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// Dilated seconds covered by the last tick. Zero while paused.
    pub fn delta_time(&self) -> f32 {
        self.delta_time.get()
    }

    pub fn tick_number(&self) -> u64 {
        self.tick_count.get()
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed.get()
    }

    pub fn dilation(&self) -> f32 {
        self.shared.dilation()
    }

    pub fn speed_index(&self) -> usize {
        self.ladder.borrow().index()
    }

    pub fn speed_count(&self) -> usize {
        self.ladder.borrow().len()
    }

    pub fn speed_options(&self) -> Vec<f32> {
        self.ladder.borrow().values().to_vec()
    }

    pub fn can_increase_speed(&self) -> bool {
        let ladder = self.ladder.borrow();
        ladder.can_step_up(ladder.index())
    }

    pub fn can_decrease_speed(&self) -> bool {
        let ladder = self.ladder.borrow();
        ladder.can_step_down(ladder.index())
    }

    /// Converts dilated seconds to wall-clock seconds.
    pub fn real_time_seconds(&self, dilated_seconds: f32) -> f32 {
        dilated_seconds / self.dilation()
    }

    /// Dilation that cancels the global one when applied on top of it.
    pub fn real_dilation(&self) -> f32 {
        1.0 / self.dilation()
    }

    fn step_speed(&self, up: bool) -> Result<f32, TimeControlError> {
        let bound_error = if up {
            TimeControlError::AtTopSpeed
        } else {
            TimeControlError::AtBottomSpeed
        };

        let movable = if up {
            self.can_increase_speed()
        } else {
            self.can_decrease_speed()
        };
        if !movable {
            return Err(bound_error);
        }
        if !self.bridge.is_available() {
            return Err(TimeControlError::EngineUnavailable);
        }
        let world = self
            .world
            .upgrade()
            .ok_or(TimeControlError::WorldUnavailable)?;

        let (dilation, index, count) = {
            let mut ladder = self.ladder.borrow_mut();
            let stepped = if up {
                ladder.step_up()
            } else {
                ladder.step_down()
            };
            let Some(dilation) = stepped else {
                return Err(bound_error);
            };
            (dilation, ladder.index(), ladder.len())
        };

        world.set_time_dilation(dilation);
        self.shared.store_dilation(dilation);
        if let Some(metrics) = &self.metrics {
            metrics.inc_speed_changes();
            metrics.set_time_dilation(dilation);
        }

        info!(
            "{} simulation speed to {}/{} ({:.3}x)",
            if up { "Increase" } else { "Decrease" },
            index + 1,
            count,
            dilation
        );
        self.notify(ClockEvent::DilationChanged);
        Ok(dilation)
    }

    fn resync_dilation(&self, external: f32) {
        let previous = self.dilation();
        self.shared.store_dilation(external);

        let (index, snapped) = {
            let mut ladder = self.ladder.borrow_mut();
            let snapped = ladder.snap_to(external);
            (ladder.index(), snapped)
        };
        let exact = snapped == Some(external);

        if exact {
            info!(
                "Time dilation changed externally from {previous:.6} to {external:.6}; \
                 exact resync to speed option {}",
                index + 1
            );
        } else {
            error!(
                "Time dilation changed externally from {previous:.6} to {external:.6}; \
                 approximate resync, speed option {} ({:.6}) does not match",
                index + 1,
                snapped.unwrap_or(external)
            );
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_resync(exact);
            metrics.set_time_dilation(external);
        }
        self.notify(ClockEvent::DilationChanged);
    }

    fn notify(&self, event: ClockEvent) {
        EventLogger::log_clock_event(
            event.as_str(),
            self.is_paused(),
            self.dilation(),
            self.tick_number(),
        );
        let delivered = self.notifier.broadcast(event, self);
        if delivered == 0 {
            debug!(event = event.as_str(), "Clock event had no subscribers");
        }
    }
}

impl Drop for SimClock {
    fn drop(&mut self) {
        self.deinitialize();
    }
}

impl std::fmt::Debug for SimClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimClock")
            .field("id", &self.id)
            .field("paused", &self.is_paused())
            .field("dilation", &self.dilation())
            .field("tick", &self.tick_count.get())
            .field("elapsed", &self.elapsed.get())
            .field("ladder", &*self.ladder.borrow())
            .finish()
    }
}

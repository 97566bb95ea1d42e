//! Player input model.
//!
//! Speed and pause inputs go straight to the clock. Click handling and
//! cursor feedback are timed in real seconds so they feel the same at any
//! simulation speed.

use std::rc::Rc;

use masstime_config::ControllerConfig;
use masstime_core::time::{RequestOutcome, SimClock};
use masstime_core::TimeControlError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Released within the threshold; a cursor effect was spawned.
    ShortPress { fx: u64 },
    /// Held past the threshold.
    Hold { seconds: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFx {
    pub id: u64,
    pub remaining: f32,
}

pub struct PlayerController {
    clock: Rc<SimClock>,
    short_press_threshold: f32,
    fx_lifetime: f32,
    pressed: bool,
    follow_time: f32,
    effects: Vec<CursorFx>,
    next_fx: u64,
    short_presses: u32,
    holds: u32,
}

impl PlayerController {
    pub fn new(clock: &Rc<SimClock>, config: &ControllerConfig) -> Self {
        Self {
            clock: Rc::clone(clock),
            short_press_threshold: config.short_press_threshold,
            fx_lifetime: config.cursor_fx_lifetime,
            pressed: false,
            follow_time: 0.0,
            effects: Vec::new(),
            next_fx: 0,
            short_presses: 0,
            holds: 0,
        }
    }

    pub fn toggle_play_pause(&self) -> Result<RequestOutcome, TimeControlError> {
        self.clock.toggle_play_pause()
    }

    pub fn increase_sim_speed(&self) -> Result<f32, TimeControlError> {
        self.clock.increase_sim_speed()
    }

    pub fn decrease_sim_speed(&self) -> Result<f32, TimeControlError> {
        self.clock.decrease_sim_speed()
    }

    pub fn press(&mut self) {
        self.pressed = true;
        self.follow_time = 0.0;
    }

    pub fn release(&mut self) -> ClickOutcome {
        let held = self.follow_time;
        self.pressed = false;
        self.follow_time = 0.0;

        if held <= self.short_press_threshold {
            let id = self.next_fx;
            self.next_fx += 1;
            self.effects.push(CursorFx {
                id,
                remaining: self.fx_lifetime,
            });
            self.short_presses += 1;
            debug!(fx = id, "Spawned cursor effect");
            ClickOutcome::ShortPress { fx: id }
        } else {
            self.holds += 1;
            ClickOutcome::Hold { seconds: held }
        }
    }

    /// Advances hold time and cursor effects by the real time in `dilated_delta`.
    pub fn tick(&mut self, dilated_delta: f32) {
        let real_delta = self.clock.real_time_seconds(dilated_delta);

        if self.pressed {
            self.follow_time += real_delta;
        }

        if self.effects.is_empty() {
            return;
        }
        self.effects.retain_mut(|fx| {
            fx.remaining -= real_delta;
            if fx.remaining > 0.0 {
                true
            } else {
                debug!(fx = fx.id, "Removed expired cursor effect");
                false
            }
        });
        if self.effects.is_empty() {
            debug!("Cursor effect set is now empty");
        }
    }

    pub fn effects(&self) -> &[CursorFx] {
        &self.effects
    }

    pub fn follow_time(&self) -> f32 {
        self.follow_time
    }

    pub fn short_presses(&self) -> u32 {
        self.short_presses
    }

    pub fn holds(&self) -> u32 {
        self.holds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Rig;

    fn controller(rig: &Rig) -> PlayerController {
        PlayerController::new(
            &rig.clock,
            &ControllerConfig {
                short_press_threshold: 0.3,
                cursor_fx_lifetime: 1.0,
            },
        )
    }

    #[test]
    fn hold_time_is_real_time() {
        let rig = Rig::new(&[1.0, 4.0], 4.0);
        let mut controller = controller(&rig);

        controller.press();
        // 0.8 dilated seconds at 4x
        controller.tick(0.8);
        assert!((controller.follow_time() - 0.2).abs() < 1e-6);
        assert!(matches!(controller.release(), ClickOutcome::ShortPress { fx: 0 }));
        assert_eq!(controller.effects().len(), 1);
    }

    #[test]
    fn long_hold_spawns_nothing() {
        let rig = Rig::new(&[0.5, 1.0], 0.5);
        let mut controller = controller(&rig);

        controller.press();
        controller.tick(0.25);
        match controller.release() {
            ClickOutcome::Hold { seconds } => assert!((seconds - 0.5).abs() < 1e-6),
            other => panic!("expected hold, got {other:?}"),
        }
        assert!(controller.effects().is_empty());
        assert_eq!(controller.holds(), 1);
    }

    #[test]
    fn cursor_effects_expire_in_real_time() {
        let rig = Rig::new(&[1.0, 8.0], 8.0);
        let mut controller = controller(&rig);

        controller.press();
        controller.release();
        // 4 dilated seconds at 8x is half a real second
        controller.tick(4.0);
        assert_eq!(controller.effects().len(), 1);
        controller.tick(4.0);
        assert!(controller.effects().is_empty());
    }

    #[test]
    fn forwards_commands() {
        let rig = Rig::new(&[0.5, 1.0], 1.0);
        let controller = controller(&rig);

        assert_eq!(
            controller.increase_sim_speed(),
            Err(TimeControlError::AtTopSpeed)
        );
        assert_eq!(controller.decrease_sim_speed(), Ok(0.5));
        assert_eq!(controller.toggle_play_pause(), Ok(RequestOutcome::Requested));
        assert!(rig.engine.has_pending());
    }
}

//! Contracts of the external collaborators the clock mediates between.
//!
//! Both are owned by the host. The clock only ever holds `Weak` references to
//! them, so a collaborator that was never created or is already torn down is
//! observed as "unavailable" rather than dangling.

use crate::events::SubscriberId;

/// Zero-argument notification delivered by the engine.
pub type EngineCallback = Box<dyn Fn()>;

/// The pausable entity-processing engine.
///
/// Pause and resume are requests. The engine applies them at a safe point of
/// its own processing cycle and reports the transition afterwards through the
/// subscribed callbacks.
pub trait MassSimulation {
    fn is_simulation_paused(&self) -> bool;

    fn pause_simulation(&self);

    fn resume_simulation(&self);

    /// Registers `on_paused` and `on_resumed` for `owner`.
    fn subscribe_pause_events(
        &self,
        owner: SubscriberId,
        on_paused: EngineCallback,
        on_resumed: EngineCallback,
    );

    /// Removes every callback registered by `owner`.
    fn unsubscribe_pause_events(&self, owner: SubscriberId);
}

/// World-level settings holding the authoritative global time dilation.
///
/// Any party may write the dilation register; the clock re-reads it every tick.
pub trait WorldSettings {
    fn time_dilation(&self) -> f32;

    fn set_time_dilation(&self, dilation: f32);

    fn min_global_time_dilation(&self) -> f32;

    fn max_global_time_dilation(&self) -> f32;
}

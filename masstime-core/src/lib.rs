//! # masstime-core
//!
//! Authoritative simulated time for a pausable mass-entity simulation.
//!
//! ### Key Submodules:
//! - `time`: `SpeedLadder` of allowed dilation steps and the `SimClock` that
//!   owns pause state, dilation, elapsed time and the tick counter
//! - `events`: `ChangeNotifier` multicast keyed by owner identity
//! - `bridge`: `PauseBridge` forwarding pause/resume to the external engine
//! - `host`: traits implemented by the external engine and world settings
//!
//! Everything runs on the owning game thread. The only cross-thread surface is
//! `ClockReader`, which exposes the pause flag and dilation through atomics.

pub mod bridge;
pub mod error;
pub mod events;
pub mod host;
pub mod time;

pub mod prelude {
    pub use crate::bridge::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::host::*;
    pub use crate::time::*;
}

pub use error::TimeControlError;

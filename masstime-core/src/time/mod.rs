//! ## masstime-core::time
//! **Simulated time and discrete speed control**
//!
//! - `SpeedLadder`: sorted dilation steps with snap-to-floor lookup
//! - `SimClock`: pause state, dilation, elapsed time and tick counter,
//!   advanced once per host tick
//! - `ClockReader`: lock-free read handle for secondary threads

mod clock;
mod ladder;

pub use clock::{ClockReader, ClockSettings, RequestOutcome, SimClock, DEFAULT_SPEED_OPTIONS};
pub use ladder::{SpeedLadder, DILATION_FLOOR};

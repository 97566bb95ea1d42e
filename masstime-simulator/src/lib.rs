// masstime-simulator/src/lib.rs

/*!
# MassTime Simulator

A headless host for the sim clock: an in-process pausable entity engine,
world settings holding the global dilation register, and models of the
game-side objects that consume the clock (control panel, real-time actor,
player controller). Scenarios script a session frame by frame and replay
deterministically, producing a BLAKE3 digest of the observed clock state.

## Key Components:
- **Session:** wires everything together and advances one frame at a time.
- **LocalMassSimulation:** applies pause requests only at its safe point.
- **SimControlPanel / RealTimeActor / PlayerController:** clock consumers
  that run on real (undilated) time.
- **Replay:** `run_scenario` and the resulting `SessionReport`.
*/

pub mod actor;
pub mod controller;
pub mod error;
pub mod mass;
pub mod replay;
pub mod scenario;
pub mod session;
pub mod widget;
pub mod world;

#[cfg(test)]
mod testing;

pub use error::SimulatorError;
pub use replay::{run_scenario, SessionReport};
pub use scenario::{Scenario, ScenarioStep};
pub use session::Session;

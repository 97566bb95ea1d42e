//! Bridge between the sim clock and the external pausable engine.
//!
//! The bridge holds no state beyond a weak reference to the engine. Requests
//! are fire-and-forget: a successful return means the request was delivered,
//! never that the engine has changed state.

use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::TimeControlError;
use crate::events::SubscriberId;
use crate::host::{EngineCallback, MassSimulation};

#[derive(Clone)]
pub struct PauseBridge {
    engine: Weak<dyn MassSimulation>,
}

impl PauseBridge {
    pub fn new(engine: Weak<dyn MassSimulation>) -> Self {
        Self { engine }
    }

    pub fn is_available(&self) -> bool {
        self.engine.strong_count() > 0
    }

    pub fn pause(&self) -> Result<(), TimeControlError> {
        let engine = self.engine()?;
        debug!("Delivering pause request to mass simulation");
        engine.pause_simulation();
        Ok(())
    }

    pub fn resume(&self) -> Result<(), TimeControlError> {
        let engine = self.engine()?;
        debug!("Delivering resume request to mass simulation");
        engine.resume_simulation();
        Ok(())
    }

    pub fn is_simulation_paused(&self) -> Result<bool, TimeControlError> {
        Ok(self.engine()?.is_simulation_paused())
    }

    pub fn subscribe(
        &self,
        owner: SubscriberId,
        on_paused: EngineCallback,
        on_resumed: EngineCallback,
    ) -> Result<(), TimeControlError> {
        self.engine()?
            .subscribe_pause_events(owner, on_paused, on_resumed);
        Ok(())
    }

    pub fn unsubscribe(&self, owner: SubscriberId) -> Result<(), TimeControlError> {
        self.engine()?.unsubscribe_pause_events(owner);
        Ok(())
    }

    fn engine(&self) -> Result<Rc<dyn MassSimulation>, TimeControlError> {
        self.engine
            .upgrade()
            .ok_or(TimeControlError::EngineUnavailable)
    }
}

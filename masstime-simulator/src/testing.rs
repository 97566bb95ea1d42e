//! Shared fixture for unit tests of the host models.

use std::rc::{Rc, Weak};

use masstime_core::host::{MassSimulation, WorldSettings};
use masstime_core::time::{ClockSettings, SimClock};

use crate::mass::LocalMassSimulation;
use crate::world::LocalWorldSettings;

pub(crate) struct Rig {
    pub engine: Rc<LocalMassSimulation>,
    pub world: Rc<LocalWorldSettings>,
    pub clock: Rc<SimClock>,
}

impl Rig {
    pub fn new(options: &[f32], dilation: f32) -> Self {
        let engine = Rc::new(LocalMassSimulation::new(false));
        let world = Rc::new(LocalWorldSettings::new(0.0001, 20.0));
        let clock = SimClock::initialize(
            ClockSettings {
                speed_options: options.to_vec(),
                initial_dilation: dilation,
                metrics: None,
            },
            Rc::downgrade(&engine) as Weak<dyn MassSimulation>,
            Rc::downgrade(&world) as Weak<dyn WorldSettings>,
        );
        Self {
            engine,
            world,
            clock,
        }
    }

    pub fn world_force(&self, dilation: f32) {
        self.world.force_time_dilation(dilation);
    }
}

//! World-level settings holding the global time dilation register.

use std::cell::Cell;

use masstime_config::WorldConfig;
use masstime_core::host::WorldSettings;
use tracing::warn;

#[derive(Debug)]
pub struct LocalWorldSettings {
    dilation: Cell<f32>,
    min: f32,
    max: f32,
}

impl LocalWorldSettings {
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            dilation: Cell::new(1.0),
            min,
            max,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.min_time_dilation, config.max_time_dilation)
    }

    /// Writes the register directly, bypassing the range clamp.
    ///
    /// Stands in for any other party touching the global dilation, such as a
    /// console command or a debugging tool.
    pub fn force_time_dilation(&self, dilation: f32) {
        warn!(dilation, "Global time dilation forced externally");
        self.dilation.set(dilation);
    }
}

impl WorldSettings for LocalWorldSettings {
    fn time_dilation(&self) -> f32 {
        self.dilation.get()
    }

    fn set_time_dilation(&self, dilation: f32) {
        self.dilation.set(dilation.clamp(self.min, self.max));
    }

    fn min_global_time_dilation(&self) -> f32 {
        self.min
    }

    fn max_global_time_dilation(&self) -> f32 {
        self.max
    }
}

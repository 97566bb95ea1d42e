//! Player input timing. All durations are real (undilated) seconds.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct ControllerConfig {
    /// Longest hold that still counts as a click.
    #[validate(range(min = 0.0))]
    pub short_press_threshold: f32,

    /// How long a cursor effect stays alive.
    #[validate(range(exclusive_min = 0.0))]
    pub cursor_fx_lifetime: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            short_press_threshold: 0.3,
            cursor_fx_lifetime: 1.0,
        }
    }
}

//! Speed ladder and start-up dilation for the sim clock.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct SimTimeConfig {
    /// Allowed time dilation steps. Order and range are fixed up at start-up.
    #[validate(custom(function = validation::validate_finite_options))]
    pub speed_options: Vec<f32>,

    /// Dilation the clock starts from, snapped down onto the ladder.
    #[validate(
        range(exclusive_min = 0.0),
        custom(function = validation::validate_finite_dilation)
    )]
    pub initial_dilation: f32,
}

fn default_speed_options() -> Vec<f32> {
    vec![0.125, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 4.0, 8.0]
}

impl Default for SimTimeConfig {
    fn default() -> Self {
        Self {
            speed_options: default_speed_options(),
            initial_dilation: 1.0,
        }
    }
}

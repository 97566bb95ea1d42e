//! Global dilation bounds of the headless world settings.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
#[validate(schema(function = validation::validate_dilation_range))]
pub struct WorldConfig {
    #[validate(range(exclusive_min = 0.0))]
    pub min_time_dilation: f32,

    #[validate(range(exclusive_min = 0.0))]
    pub max_time_dilation: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            min_time_dilation: 0.0001,
            max_time_dilation: 20.0,
        }
    }
}

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct WidgetConfig {
    /// Real seconds between refreshes of the tick, elapsed and delta texts.
    #[validate(range(min = 0.0))]
    pub update_interval: f32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            update_interval: 0.1,
        }
    }
}

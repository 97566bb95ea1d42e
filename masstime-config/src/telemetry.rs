//! Logging and metrics switches.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Fallback filter when `RUST_LOG` is not set.
    #[validate(custom(function = validation::validate_log_level))]
    pub log_level: String,

    pub json_logs: bool,

    /// Record prometheus metrics for the session.
    pub metrics: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            json_logs: false,
            metrics: false,
        }
    }
}

//! Custom validation functions shared by the configuration sections.

use validator::ValidationError;

use crate::world::WorldConfig;

/// Every speed option must be a finite number.
///
/// Range is not checked here. Options outside the world's dilation range
/// are pruned when the clock starts.
pub fn validate_finite_options(options: &[f32]) -> Result<(), ValidationError> {
    if options.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::new("non_finite_speed_option"))
    }
}

/// Range checks pass NaN through, so it is caught here.
pub fn validate_finite_dilation(dilation: f32) -> Result<(), ValidationError> {
    if dilation.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("non_finite_dilation"))
    }
}

pub fn validate_dilation_range(world: &WorldConfig) -> Result<(), ValidationError> {
    if world.min_time_dilation <= world.max_time_dilation {
        Ok(())
    } else {
        let mut error = ValidationError::new("inverted_dilation_range");
        error.message = Some("min_time_dilation must not exceed max_time_dilation".into());
        Err(error)
    }
}

pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"].contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

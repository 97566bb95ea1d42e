//! # MassTime Configuration
//!
//! Layered settings for the sim clock and its headless host.
//!
//! ## Sections
//! - `sim_time`: the speed ladder (the only persisted clock state) and the
//!   start-up dilation
//! - `world`: global dilation bounds of the world settings
//! - `widget`, `controller`: real-time UI and input timing
//! - `telemetry`: log level, JSON logs, metrics

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod controller;
mod error;
mod sim_time;
mod telemetry;
mod validation;
mod widget;
mod world;

pub use controller::ControllerConfig;
pub use error::ConfigError;
pub use sim_time::SimTimeConfig;
pub use telemetry::TelemetryConfig;
pub use widget::WidgetConfig;
pub use world::WorldConfig;

const BASE_FILE: &str = "config/masstime.yaml";
const ENV_PREFIX: &str = "MASSTIME_";

#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
#[serde(default)]
pub struct MassTimeConfig {
    #[validate(nested)]
    pub sim_time: SimTimeConfig,

    #[validate(nested)]
    pub world: WorldConfig,

    #[validate(nested)]
    pub widget: WidgetConfig,

    #[validate(nested)]
    pub controller: ControllerConfig,

    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl MassTimeConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/masstime.yaml`, skipped if missing
    /// 3. `config/<MASSTIME_ENV>.yaml` (`development` when unset), skipped if missing
    /// 4. `MASSTIME_*` environment variables, `__` separating sections
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(MassTimeConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("MASSTIME_ENV").unwrap_or_else(|_| "development".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific file, then environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment = Figment::from(Serialized::defaults(MassTimeConfig::default()))
            .merge(Yaml::file(path));
        Self::extract(figment)
    }

    /// `load_from_path` when a path is given, `load` otherwise.
    pub fn resolve<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn default_config_validates() {
        let config = MassTimeConfig::default();
        config.validate().expect("default config should validate");
        assert_eq!(config.sim_time.speed_options.len(), 10);
        assert_eq!(config.sim_time.initial_dilation, 1.0);
    }

    #[test]
    fn base_file_then_environment() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/masstime.yaml",
                r#"
sim_time:
  speed_options: [2.0, 0.5, 1.0]
world:
  max_time_dilation: 10.0
"#,
            )?;
            jail.set_env("MASSTIME_SIM_TIME__INITIAL_DILATION", "2.0");
            jail.set_env("MASSTIME_TELEMETRY__LOG_LEVEL", "debug");

            let config = MassTimeConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.sim_time.speed_options, vec![2.0, 0.5, 1.0]);
            assert_eq!(config.sim_time.initial_dilation, 2.0);
            assert_eq!(config.world.max_time_dilation, 10.0);
            assert_eq!(config.world.min_time_dilation, 0.0001);
            assert_eq!(config.telemetry.log_level, "debug");
            assert_eq!(config.widget.update_interval, 0.1);
            Ok(())
        });
    }

    #[test]
    fn environment_file_overrides_base() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/masstime.yaml", "widget:\n  update_interval: 0.5\n")?;
            jail.create_file("config/replay.yaml", "widget:\n  update_interval: 0.25\n")?;
            jail.set_env("MASSTIME_ENV", "replay");

            let config = MassTimeConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.widget.update_interval, 0.25);
            Ok(())
        });
    }

    #[test]
    fn out_of_range_options_are_accepted() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.yaml", "sim_time:\n  speed_options: [0.01, 500.0]\n")?;
            let config = MassTimeConfig::load_from_path("custom.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config.sim_time.speed_options, vec![0.01, 500.0]);
            Ok(())
        });
    }

    #[test]
    fn inverted_world_range_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bad.yaml",
                "world:\n  min_time_dilation: 5.0\n  max_time_dilation: 1.0\n",
            )?;
            let err = MassTimeConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err.to_string().contains("world"));
            Ok(())
        });
    }

    #[test]
    fn nan_initial_dilation_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("nan.yaml", "sim_time:\n  initial_dilation: .nan\n")?;
            let err = MassTimeConfig::load_from_path("nan.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err.to_string().contains("sim_time.initial_dilation"));
            Ok(())
        });
    }

    #[test]
    fn invalid_fields_are_named() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bad.yaml",
                "sim_time:\n  initial_dilation: 0.0\ntelemetry:\n  log_level: loud\n",
            )?;
            let err = MassTimeConfig::load_from_path("bad.yaml").unwrap_err();
            let message = err.to_string();
            assert!(message.contains("sim_time.initial_dilation"));
            assert!(message.contains("telemetry.log_level"));
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_reported() {
        let err = MassTimeConfig::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}

//! Scripted session input, loaded from YAML.
//!
//! ```yaml
//! seed: 7
//! frame_delta: 0.016
//! frame_jitter: 0.002
//! steps:
//!   - frames: 30
//!   - increase_speed
//!   - external_dilation: 1.5
//!   - click: { hold_frames: 3 }
//!   - toggle_play_pause
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: u64,

    /// Real seconds per frame.
    #[serde(default = "default_frame_delta")]
    pub frame_delta: f32,

    /// Largest random deviation applied to each frame's real delta.
    #[serde(default)]
    pub frame_jitter: f32,

    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStep {
    Frames(u32),
    TogglePlayPause,
    IncreaseSpeed,
    DecreaseSpeed,
    /// Writes the world register behind the clock's back.
    ExternalDilation(f32),
    /// Press, hold for the given number of frames, release.
    Click { hold_frames: u32 },
}

fn default_frame_delta() -> f32 {
    1.0 / 60.0
}

impl Scenario {
    /// A scenario that only runs frames.
    pub fn frames(count: u32, frame_delta: f32) -> Self {
        Self {
            seed: 0,
            frame_delta,
            frame_jitter: 0.0,
            steps: vec![ScenarioStep::Frames(count)],
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimulatorError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SimulatorError::ScenarioNotFound(format!(
                "{} does not exist",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, SimulatorError> {
        let scenario: Self = serde_yaml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        if !(self.frame_delta.is_finite() && self.frame_delta >= 0.0) {
            return Err(SimulatorError::InvalidScenario(format!(
                "frame_delta must be a non-negative number, got {}",
                self.frame_delta
            )));
        }
        if !(self.frame_jitter >= 0.0 && self.frame_jitter <= self.frame_delta) {
            return Err(SimulatorError::InvalidScenario(format!(
                "frame_jitter must be between 0 and frame_delta ({}), got {}",
                self.frame_delta, self.frame_jitter
            )));
        }
        for step in &self.steps {
            if let ScenarioStep::ExternalDilation(d) = step {
                if !(d.is_finite() && *d > 0.0) {
                    return Err(SimulatorError::InvalidScenario(format!(
                        "external_dilation must be a positive number, got {d}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn total_frames(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| match step {
                ScenarioStep::Frames(n) => u64::from(*n),
                ScenarioStep::Click { hold_frames } => u64::from(*hold_frames),
                _ => 0,
            })
            .sum()
    }
}

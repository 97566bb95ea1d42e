//! Deterministic scenario replay.
//!
//! Every frame and command folds the observable clock state into a BLAKE3
//! digest. Two runs of the same scenario with the same configuration and
//! seed produce the same digest.

use std::fmt;

use blake3::Hasher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, instrument};

use masstime_config::MassTimeConfig;
use masstime_core::TimeControlError;

use crate::error::SimulatorError;
use crate::scenario::{Scenario, ScenarioStep};
use crate::session::Session;

/// Final state of a replayed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub frames: u64,
    pub ticks: u64,
    pub elapsed: f64,
    pub real_elapsed: f64,
    pub dilation: f32,
    pub speed_index: usize,
    pub speed_count: usize,
    pub paused: bool,
    pub accepted_commands: u32,
    pub rejected_commands: u32,
    pub short_presses: u32,
    pub holds: u32,
    pub state_hash: String,
    pub metrics: Option<String>,
}

impl SessionReport {
    pub fn validate_hash(&self, expected: &str) -> Result<(), SimulatorError> {
        if self.state_hash.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(SimulatorError::HashMismatch {
                expected: expected.to_string(),
                actual: self.state_hash.clone(),
            })
        }
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames:      {}", self.frames)?;
        writeln!(f, "ticks:       {}", self.ticks)?;
        writeln!(f, "elapsed:     {:.3}s sim / {:.3}s real", self.elapsed, self.real_elapsed)?;
        writeln!(
            f,
            "speed:       {}/{} ({:.3}x)",
            self.speed_index + 1,
            self.speed_count,
            self.dilation
        )?;
        writeln!(f, "paused:      {}", self.paused)?;
        writeln!(
            f,
            "commands:    {} accepted, {} rejected",
            self.accepted_commands, self.rejected_commands
        )?;
        writeln!(f, "clicks:      {} short, {} held", self.short_presses, self.holds)?;
        write!(f, "state hash:  {}", self.state_hash)
    }
}

struct Replay<'a> {
    scenario: &'a Scenario,
    session: Session,
    rng: StdRng,
    hasher: Hasher,
    accepted: u32,
    rejected: u32,
}

/// Runs `scenario` in a fresh session built from `config`.
#[instrument(skip_all, fields(seed = scenario.seed))]
pub fn run_scenario(
    config: &MassTimeConfig,
    scenario: &Scenario,
) -> Result<SessionReport, SimulatorError> {
    scenario.validate()?;
    info!(
        steps = scenario.steps.len(),
        frames = scenario.total_frames(),
        "Running scenario"
    );

    let mut replay = Replay {
        scenario,
        session: Session::new(config)?,
        rng: StdRng::seed_from_u64(scenario.seed),
        hasher: Hasher::new(),
        accepted: 0,
        rejected: 0,
    };
    for step in &scenario.steps {
        replay.apply(step);
    }
    replay.finish()
}

impl Replay<'_> {
    fn apply(&mut self, step: &ScenarioStep) {
        match step {
            ScenarioStep::Frames(count) => {
                for _ in 0..*count {
                    self.frame();
                }
            }
            ScenarioStep::TogglePlayPause => {
                let result = self.session.controller().toggle_play_pause();
                self.command("toggle_play_pause", result.map(|_| ()));
            }
            ScenarioStep::IncreaseSpeed => {
                let result = self.session.controller().increase_sim_speed();
                self.command("increase_speed", result.map(|_| ()));
            }
            ScenarioStep::DecreaseSpeed => {
                let result = self.session.controller().decrease_sim_speed();
                self.command("decrease_speed", result.map(|_| ()));
            }
            ScenarioStep::ExternalDilation(dilation) => {
                self.session.world().force_time_dilation(*dilation);
                self.hasher.update(b"external_dilation");
                self.hasher.update(&dilation.to_bits().to_le_bytes());
            }
            ScenarioStep::Click { hold_frames } => {
                self.session.controller_mut().press();
                for _ in 0..*hold_frames {
                    self.frame();
                }
                let outcome = self.session.controller_mut().release();
                debug!(?outcome, "Click released");
                self.hasher.update(format!("{outcome:?}").as_bytes());
            }
        }
    }

    fn frame(&mut self) {
        let jitter = self.scenario.frame_jitter;
        let offset = if jitter > 0.0 {
            self.rng.random_range(-jitter..=jitter)
        } else {
            0.0
        };
        let real_delta = (self.scenario.frame_delta + offset).max(0.0);
        self.session.advance_frame(real_delta);

        let clock = self.session.clock();
        self.hasher.update(&self.session.frames().to_le_bytes());
        self.hasher.update(&[u8::from(clock.is_paused())]);
        self.hasher.update(&clock.dilation().to_bits().to_le_bytes());
        self.hasher.update(&clock.tick_number().to_le_bytes());
        self.hasher.update(&clock.elapsed_time().to_bits().to_le_bytes());
        self.hasher.update(&(clock.speed_index() as u64).to_le_bytes());
    }

    fn command(&mut self, name: &str, result: Result<(), TimeControlError>) {
        self.hasher.update(name.as_bytes());
        match result {
            Ok(()) => {
                self.accepted += 1;
                self.hasher.update(&[1]);
            }
            Err(e) => {
                self.rejected += 1;
                debug!(command = name, "Command rejected: {e}");
                self.hasher.update(&[0]);
            }
        }
    }

    fn finish(mut self) -> Result<SessionReport, SimulatorError> {
        let metrics = self
            .session
            .metrics()
            .map(|m| m.gather_metrics())
            .transpose()?;

        let clock = self.session.clock();
        let controller = self.session.controller();
        let report = SessionReport {
            frames: self.session.frames(),
            ticks: clock.tick_number(),
            elapsed: clock.elapsed_time(),
            real_elapsed: self.session.real_elapsed(),
            dilation: clock.dilation(),
            speed_index: clock.speed_index(),
            speed_count: clock.speed_count(),
            paused: clock.is_paused(),
            accepted_commands: self.accepted,
            rejected_commands: self.rejected,
            short_presses: controller.short_presses(),
            holds: controller.holds(),
            state_hash: hex::encode(self.hasher.finalize().as_bytes()),
            metrics,
        };
        self.session.shutdown();

        info!(hash = %report.state_hash, frames = report.frames, "Scenario complete");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_hash() {
        let config = MassTimeConfig::default();
        let mut scenario = Scenario::frames(20, 0.016);
        scenario.seed = 9;
        scenario.frame_jitter = 0.004;

        let a = run_scenario(&config, &scenario).unwrap();
        let b = run_scenario(&config, &scenario).unwrap();
        assert_eq!(a.state_hash, b.state_hash);
        assert_eq!(a.state_hash.len(), 64);
        a.validate_hash(&b.state_hash.to_uppercase()).unwrap();
    }

    #[test]
    fn oversized_jitter_is_rejected_before_running() {
        let mut scenario = Scenario::frames(5, 0.016);
        scenario.frame_jitter = 3.0e38;

        let err = run_scenario(&MassTimeConfig::default(), &scenario).unwrap_err();
        assert!(matches!(err, SimulatorError::InvalidScenario(_)));
    }

    #[test]
    fn different_inputs_different_hash() {
        let config = MassTimeConfig::default();
        let plain = run_scenario(&config, &Scenario::frames(10, 0.016)).unwrap();

        let mut faster = Scenario::frames(10, 0.016);
        faster.steps.insert(0, ScenarioStep::IncreaseSpeed);
        let faster = run_scenario(&config, &faster).unwrap();

        assert_ne!(plain.state_hash, faster.state_hash);
        assert!(matches!(
            plain.validate_hash(&faster.state_hash),
            Err(SimulatorError::HashMismatch { .. })
        ));
    }

    #[test]
    fn rejected_commands_are_counted() {
        let config = MassTimeConfig::default();
        let mut scenario = Scenario::frames(1, 0.016);
        scenario.steps = std::iter::repeat(ScenarioStep::IncreaseSpeed).take(12).collect();

        let report = run_scenario(&config, &scenario).unwrap();
        // default ladder starts at 1.0 (index 4 of 10)
        assert_eq!(report.accepted_commands, 5);
        assert_eq!(report.rejected_commands, 7);
        assert_eq!(report.dilation, 8.0);
    }

    #[test]
    fn metrics_are_reported_when_enabled() {
        let mut config = MassTimeConfig::default();
        config.telemetry.metrics = true;
        let report = run_scenario(&config, &Scenario::frames(3, 0.016)).unwrap();

        let metrics = report.metrics.unwrap();
        assert!(metrics.contains("masstime_ticks_total 3"));
    }
}

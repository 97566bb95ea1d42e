use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use masstime_config::MassTimeConfig;
use masstime_simulator::{run_scenario, Scenario, Session};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scenario file, or run plain frames when none is given
    Run(RunArgs),
    /// Print the speed ladder after range pruning
    Ladder(LadderArgs),
}

impl Commands {
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Run(args) => args.config.as_deref(),
            Commands::Ladder(args) => args.config.as_deref(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Scenario YAML to replay
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
    /// Frames to run when no scenario is provided
    #[arg(long, default_value_t = 600)]
    pub frames: u32,
    /// Real seconds per frame when no scenario is provided
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub delta: f32,
    /// Configuration file; defaults to config/masstime.yaml and MASSTIME_* variables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Expected state hash; the run fails if it differs
    #[arg(long)]
    pub validate_hash: Option<String>,
    /// Print prometheus metrics after the run
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LadderArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run_session(
    args: RunArgs,
    config: &MassTimeConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let scenario = match &args.scenario {
        Some(path) => {
            info!("Replaying scenario {}", path.display());
            Scenario::load(path)?
        }
        None => Scenario::frames(args.frames, args.delta),
    };

    let report = run_scenario(config, &scenario)?;
    println!("{report}");

    if let Some(metrics) = &report.metrics {
        println!();
        print!("{metrics}");
    }

    if let Some(expected) = args.validate_hash.as_deref() {
        report.validate_hash(expected)?;
        println!("State hash matches");
    }
    Ok(())
}

pub fn show_ladder(config: &MassTimeConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let session = Session::new(config)?;
    let clock = session.clock();

    println!(
        "world range: {} .. {}",
        config.world.min_time_dilation, config.world.max_time_dilation
    );
    for (index, value) in clock.speed_options().iter().enumerate() {
        let marker = if index == clock.speed_index() { '>' } else { ' ' };
        println!("{marker} {:>2}  {value:.3}x", index + 1);
    }
    println!(
        "start: {}/{} ({:.3}x)",
        clock.speed_index() + 1,
        clock.speed_count(),
        clock.dilation()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_flags() {
        let cli = Cli::parse_from([
            "masstime",
            "run",
            "--frames",
            "10",
            "--delta",
            "0.02",
            "--validate-hash",
            "abc",
            "--metrics",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.frames, 10);
        assert_eq!(args.delta, 0.02);
        assert_eq!(args.validate_hash.as_deref(), Some("abc"));
        assert!(args.metrics);
        assert!(args.scenario.is_none());
    }

    #[test]
    fn ladder_takes_config_path() {
        let cli = Cli::parse_from(["masstime", "ladder", "--config", "custom.yaml"]);
        assert_eq!(cli.command.config_path(), Some(Path::new("custom.yaml")));
    }
}

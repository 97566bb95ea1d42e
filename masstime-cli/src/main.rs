//! ## masstime-cli
//! **Headless front-end for the sim clock**
//!
//! Replays scripted sessions and prints the speed ladder a configuration
//! resolves to.

use clap::Parser;
use masstime_config::MassTimeConfig;
use masstime_telemetry::logging::EventLogger;

mod commands;

use commands::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let mut config = MassTimeConfig::resolve(cli.command.config_path())?;
    if let Commands::Run(args) = &cli.command {
        config.telemetry.metrics |= args.metrics;
    }
    EventLogger::init(&config.telemetry.log_level, config.telemetry.json_logs)?;

    match cli.command {
        Commands::Run(args) => commands::run_session(args, &config),
        Commands::Ladder(_) => commands::show_ladder(&config),
    }
}

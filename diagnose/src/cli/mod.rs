//! CLI module for the diagnosis engine
//!
//! Provides:
//! - forward: derive diagnoses and recommendations from symptoms
//! - backward: try to prove one goal from symptoms
//! - facts: list known facts, symptoms numbered for selection
//! - rules: list the rule set

mod args;
mod commands;
mod io;

use tracing_subscriber::EnvFilter;

use args::Cli;
use commands::run_command;

/// Parse arguments, set up logging and run the selected command.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    run_command(&cli, &mut stdout.lock())
}

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run() {
        eprintln!("\n❌ Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!(version = env!("CARGO_PKG_VERSION"), "NanoRefine CLI starting.");
    debug!(?cli, "Parsed command line.");

    if let Some(threads) = cli.threads {
        debug!(threads, "Configuring the global thread pool.");
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| CliError::Other(anyhow::anyhow!("Cannot size thread pool: {e}")))?;
    }

    let (name, outcome) = match cli.command {
        Commands::EnergyFilter(args) => ("energy-filter", commands::energy_filter::run(args)),
        Commands::GraphFilter(args) => ("graph-filter", commands::graph_filter::run(args)),
        Commands::QualityGate(args) => ("quality-gate", commands::quality_gate::run(args)),
        Commands::Finalize(args) => ("finalize", commands::finalize::run(args)),
    };

    match &outcome {
        Ok(()) => {
            info!(command = name, "Command finished.");
            println!("✅ {name} completed successfully.");
        }
        Err(e) => error!(command = name, "Command failed: {e}"),
    }

    outcome
}

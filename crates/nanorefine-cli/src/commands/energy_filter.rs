use super::{load_batches, write_batch};
use crate::cli::EnergyFilterArgs;
use crate::config::{CliOverrides, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use nanorefine::engine::progress::ProgressReporter;
use nanorefine::workflows::refine;
use tracing::{info, warn};

pub fn run(args: EnergyFilterArgs) -> Result<()> {
    let overrides = CliOverrides {
        energy_threshold: args.threshold,
        ..Default::default()
    };
    let config = build_config(&args.common, &overrides)?;
    let window = &config.core_config.energy_window;

    let parts = load_batches(&config.input_paths)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Applying a {:.3} eV energy window to {} structure(s)...",
        window.threshold,
        parts.structures.len()
    );
    info!(threshold = window.threshold, "Invoking the energy window stage...");
    let result = refine::energy_window(parts.structures, window, &reporter)?;

    if result.structures.is_empty() {
        warn!("Energy window kept no structures.");
    }

    write_batch(
        &config.output_path,
        &parts.template,
        &result.structures,
        Some(&parts.descriptors),
    )?;
    println!(
        "✓ Kept {} of {} structure(s), written to: {}",
        result.report.output,
        result.report.input,
        config.output_path.display()
    );

    Ok(())
}

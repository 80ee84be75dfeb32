use super::{load_batches, write_batch};
use crate::cli::FinalizeArgs;
use crate::config::{CliOverrides, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use nanorefine::engine::progress::ProgressReporter;
use nanorefine::workflows::refine::{self, FinalizeOptions};
use tracing::{info, warn};

pub fn run(args: FinalizeArgs) -> Result<()> {
    let overrides = CliOverrides {
        descriptor_kind: args.descriptor.descriptor,
        cutoff_scale: args.descriptor.cutoff_scale,
        ..Default::default()
    };
    let config = build_config(&args.common, &overrides)?;
    let options = FinalizeOptions {
        joined_filter: !args.no_joined_filter,
    };

    let parts = load_batches(&config.input_paths)?;
    let descriptor = refine::descriptor_for(&config.core_config.descriptor, parts.descriptors.clone());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Finalizing {} refined structure(s)...",
        parts.structures.len()
    );
    info!("Invoking the finalize workflow...");
    let result = refine::finalize(
        parts.structures,
        &parts.template,
        descriptor.as_ref(),
        &options,
        &reporter,
    )?;

    if let Some(connectivity) = result.connectivity {
        println!(
            "  {} structure(s) dropped with split clusters.",
            connectivity.dropped()
        );
    }
    if result.structures.is_empty() {
        warn!("Finalization kept no structures.");
        println!("Warning: no structure survived finalization.");
    }

    write_batch(
        &config.output_path,
        &parts.template,
        &result.structures,
        Some(&parts.descriptors),
    )?;
    println!(
        "✓ {} final structure(s) written to: {}",
        result.structures.len(),
        config.output_path.display()
    );

    Ok(())
}

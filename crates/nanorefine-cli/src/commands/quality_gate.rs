use super::write_batch;
use crate::cli::QualityGateArgs;
use crate::config::{CliOverrides, build_config};
use crate::error::{CliError, Result};
use crate::utils::parser;
use crate::utils::progress::CliProgressHandler;
use nanorefine::core::io::batch::{JsonFile, OutcomeBatch, OutcomeRecord};
use nanorefine::core::io::report::write_gate_report_to_path;
use nanorefine::core::models::template::Template;
use nanorefine::engine::error::RefineError;
use nanorefine::engine::filters::outlier::RelaxationOutcome;
use nanorefine::engine::progress::ProgressReporter;
use nanorefine::workflows::refine;
use std::path::PathBuf;
use tracing::info;

pub fn run(args: QualityGateArgs) -> Result<()> {
    let overrides = CliOverrides {
        gate_bandwidth: args.bandwidth,
        ..Default::default()
    };
    let config = build_config(&args.common, &overrides)?;
    let gate_config = &config.core_config.quality_gate;

    let (template, records) = load_outcomes(&config.input_paths)?;
    let outcomes = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| to_outcome(index, record))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Screening {} surrogate relaxation(s) with a {:.3} eV kernel...",
        outcomes.len(),
        gate_config.bandwidth
    );
    info!("Invoking the quality gate workflow...");
    let result = refine::quality_gate(&outcomes, gate_config, &reporter)?;

    println!(
        "  Threshold at {:.4} eV: {} accepted, {} reset to their unrelaxed geometry.",
        result.threshold(),
        result.accepted_count(),
        result.rejected_count()
    );

    write_batch(&config.output_path, &template, &result.structures, None)?;

    if let Some(report) = &args.report {
        let report_path = parser::run_output_path(report, args.common.run_index);
        info!("Writing gate report to {:?}", &report_path);
        write_gate_report_to_path(&report_path, &result.records(&outcomes))?;
        println!("  Gate report written to: {}", report_path.display());
    }

    println!(
        "✓ {} structure(s) written to: {}",
        result.structures.len(),
        config.output_path.display()
    );

    Ok(())
}

/// Pools the outcome batches at `paths` in order. Every batch must share the template.
fn load_outcomes(paths: &[PathBuf]) -> Result<(Template, Vec<OutcomeRecord>)> {
    let mut template: Option<Template> = None;
    let mut records = Vec::new();
    for path in paths {
        info!("Loading relaxation outcomes from {:?}", path);
        let batch = OutcomeBatch::read_from_path(path)?;
        let batch_template = Template::new(batch.template.to_structure());
        match &template {
            Some(pooled) if *pooled != batch_template => {
                return Err(RefineError::PreconditionViolation(format!(
                    "outcome batch {:?} is built on a different template",
                    path
                ))
                .into());
            }
            Some(_) => {}
            None => template = Some(batch_template),
        }
        records.extend(batch.outcomes);
    }
    let template =
        template.ok_or_else(|| CliError::Argument("No input batch given.".to_string()))?;
    Ok((template, records))
}

/// Takes the ground-truth energy from the record, or else from the unrelaxed structure.
///
/// An energy stored on the relaxed structure must be the record's surrogate prediction.
fn to_outcome(
    index: usize,
    record: OutcomeRecord,
) -> std::result::Result<RelaxationOutcome, RefineError> {
    let unrelaxed = record.unrelaxed.to_structure();
    let reference_energy = record
        .reference_energy
        .or(unrelaxed.energy())
        .ok_or(RefineError::MissingEnergy { index })?;

    let relaxed = record.relaxed.to_structure();
    if let Some(stored) = relaxed.energy() {
        let tolerance = 1e-9 * stored.abs().max(1.0);
        if (stored - record.predicted_final).abs() > tolerance {
            return Err(RefineError::PreconditionViolation(format!(
                "outcome {index}: relaxed energy {stored} differs from predicted final energy {}",
                record.predicted_final
            )));
        }
    }

    Ok(RelaxationOutcome::new(
        unrelaxed,
        relaxed,
        record.predicted_initial,
        record.predicted_final,
        reference_energy,
    ))
}

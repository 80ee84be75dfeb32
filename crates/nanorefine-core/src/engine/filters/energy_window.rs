use crate::core::models::structure::Structure;
use crate::engine::error::RefineError;
use crate::engine::filters::attached_energies;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument};

/// Keeps the structures whose energy lies strictly below `min(energy) + threshold`.
///
/// Input order is preserved. Every structure must carry an energy.
#[instrument(skip_all, name = "energy_window_filter")]
pub fn run(
    structures: Vec<Structure>,
    threshold: f64,
    reporter: &ProgressReporter,
) -> Result<Vec<Structure>, RefineError> {
    if structures.is_empty() {
        return Err(RefineError::EmptyInput {
            stage: "energy window",
        });
    }
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(RefineError::PreconditionViolation(format!(
            "energy window must be a non-negative finite energy, got {threshold}"
        )));
    }

    let energies = attached_energies(&structures)?;
    let minimum = energies.iter().copied().fold(f64::INFINITY, f64::min);
    let cutoff = minimum + threshold;
    debug!(minimum, cutoff, "Energy window bounds computed.");

    let input = structures.len();
    let kept: Vec<Structure> = structures
        .into_iter()
        .zip(energies)
        .filter(|(_, energy)| *energy < cutoff)
        .map(|(structure, _)| structure)
        .collect();

    info!(
        threshold,
        kept = kept.len(),
        dropped = input - kept.len(),
        "Energy window applied."
    );
    reporter.report(Progress::StageSummary {
        stage: "energy window",
        input,
        output: kept.len(),
    });
    Ok(kept)
}

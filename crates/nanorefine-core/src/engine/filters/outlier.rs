use crate::core::calculators::single_point::SinglePoint;
use crate::core::calculators::{EnergyCalculator, attach};
use crate::core::io::report::GateRecord;
use crate::core::models::structure::Structure;
use crate::core::stats::StatsError;
use crate::core::stats::kde::GaussianKde;
use crate::core::stats::minimize::{MinimizeSettings, minimize_scalar};
use crate::engine::config::QualityGateConfig;
use crate::engine::error::RefineError;
use crate::engine::progress::ProgressReporter;
use tracing::{debug, info, instrument, warn};

/// One structure before and after a surrogate relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationOutcome {
    pub unrelaxed: Structure,
    pub relaxed: Structure,
    /// Surrogate energy of the unrelaxed geometry.
    pub predicted_initial: f64,
    /// Surrogate energy of the relaxed geometry.
    pub predicted_final: f64,
    /// Ground-truth energy of the unrelaxed geometry.
    pub reference_energy: f64,
}

impl RelaxationOutcome {
    pub fn new(
        unrelaxed: Structure,
        relaxed: Structure,
        predicted_initial: f64,
        predicted_final: f64,
        reference_energy: f64,
    ) -> Self {
        Self {
            unrelaxed,
            relaxed,
            predicted_initial,
            predicted_final,
            reference_energy,
        }
    }

    /// Evaluates both geometries with the surrogate `calculator`.
    ///
    /// The ground-truth energy is taken from the result attached to `unrelaxed`. The relaxed
    /// structure is returned with its surrogate energy attached.
    pub fn evaluate(
        calculator: &dyn EnergyCalculator,
        index: usize,
        unrelaxed: Structure,
        relaxed: Structure,
    ) -> Result<Self, RefineError> {
        let reference_energy = unrelaxed
            .energy()
            .ok_or(RefineError::MissingEnergy { index })?;
        let evaluation_failed = |source| RefineError::EvaluationFailed { index, source };
        let predicted_initial = calculator.energy(&unrelaxed).map_err(evaluation_failed)?;
        let relaxed = attach(calculator, relaxed).map_err(evaluation_failed)?;
        let predicted_final = relaxed.energy().ok_or(RefineError::MissingEnergy { index })?;

        Ok(Self::new(
            unrelaxed,
            relaxed,
            predicted_initial,
            predicted_final,
            reference_energy,
        ))
    }

    /// Surrogate energy change over the relaxation, `E1 - E0`.
    pub fn energy_change(&self) -> f64 {
        self.predicted_final - self.predicted_initial
    }
}

/// Shape of the fitted energy-change density around the decision threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdDiagnostics {
    pub peak: f64,
    pub peak_density: f64,
    /// The decision threshold.
    pub valley: f64,
    pub valley_density: f64,
    pub kernel_width: f64,
    /// The valley search stopped on its seed without moving left.
    pub valley_at_seed: bool,
}

impl ThresholdDiagnostics {
    /// Density at the valley relative to the peak. Values near one mean the two populations are
    /// not separated and the threshold is unreliable.
    pub fn separation_ratio(&self) -> f64 {
        if self.peak_density > 0.0 {
            self.valley_density / self.peak_density
        } else {
            1.0
        }
    }
}

/// Fits the energy-change density and locates the valley left of its dominant peak.
///
/// The peak search is seeded at the largest change; the valley search is seeded one bandwidth
/// left of the peak and may not move right of its seed.
#[instrument(skip_all, name = "gate_threshold")]
pub fn find_threshold(
    differences: &[f64],
    config: &QualityGateConfig,
) -> Result<ThresholdDiagnostics, RefineError> {
    let samples = differences.len();
    let kde = GaussianKde::with_absolute_bandwidth(differences, config.bandwidth).map_err(
        |error| match error {
            StatsError::ZeroVariance { std_dev } => {
                RefineError::DegenerateDistribution { samples, std_dev }
            }
            StatsError::TooFewSamples { .. } => RefineError::DegenerateDistribution {
                samples,
                std_dev: 0.0,
            },
            other => RefineError::PreconditionViolation(other.to_string()),
        },
    )?;

    let settings = MinimizeSettings::with_step(config.bandwidth / 2.0);
    let seed = differences.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let peak = minimize_scalar(
        |x| -kde.density(x),
        |x| -kde.derivative(x),
        seed,
        None,
        &settings,
    )
    .map_err(|error| RefineError::PreconditionViolation(error.to_string()))?;

    let valley_seed = peak.x - config.bandwidth;
    let valley = minimize_scalar(
        |x| kde.density(x),
        |x| kde.derivative(x),
        valley_seed,
        Some(valley_seed),
        &settings,
    )
    .map_err(|error| RefineError::PreconditionViolation(error.to_string()))?;

    if !(peak.converged && valley.converged) {
        warn!(
            peak_converged = peak.converged,
            valley_converged = valley.converged,
            "Density search ran out of steps; threshold may be inaccurate."
        );
    }

    let diagnostics = ThresholdDiagnostics {
        peak: peak.x,
        peak_density: -peak.value,
        valley: valley.x,
        valley_density: valley.value,
        kernel_width: kde.kernel_width(),
        valley_at_seed: valley.hit_bound,
    };
    debug!(
        peak = diagnostics.peak,
        valley = diagnostics.valley,
        peak_iterations = peak.iterations,
        valley_iterations = valley.iterations,
        "Energy-change density analysed."
    );

    let ratio = diagnostics.separation_ratio();
    if ratio > config.separation_warning {
        warn!(
            ratio,
            limit = config.separation_warning,
            threshold = diagnostics.valley,
            "Relaxation populations are poorly separated; the quality-gate threshold is unstable."
        );
    }
    Ok(diagnostics)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Accepted,
    Rejected,
}

/// Structures passed on by the quality gate, one per input outcome in input order.
#[derive(Debug, Clone)]
pub struct GateResult {
    pub structures: Vec<Structure>,
    pub decisions: Vec<GateDecision>,
    pub energy_changes: Vec<f64>,
    pub diagnostics: ThresholdDiagnostics,
}

impl GateResult {
    pub fn threshold(&self) -> f64 {
        self.diagnostics.valley
    }

    pub fn accepted_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|&&decision| decision == GateDecision::Accepted)
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.decisions.len() - self.accepted_count()
    }

    /// Report rows for every structure, given the outcomes the gate was run on.
    pub fn records(&self, outcomes: &[RelaxationOutcome]) -> Vec<GateRecord> {
        outcomes
            .iter()
            .zip(&self.structures)
            .zip(&self.decisions)
            .enumerate()
            .map(|(index, ((outcome, structure), decision))| GateRecord {
                index,
                predicted_initial: outcome.predicted_initial,
                predicted_final: outcome.predicted_final,
                energy_change: outcome.energy_change(),
                accepted: *decision == GateDecision::Accepted,
                final_energy: structure.energy(),
            })
            .collect()
    }
}

/// Separates clean surrogate relaxations from collapsed ones.
///
/// A relaxation is accepted when its energy change lies above the density valley. Accepted
/// outcomes pass on their relaxed structure, with the surrogate energy attached when it carries
/// none. Rejected outcomes pass on the unrelaxed
/// geometry with constraints cleared and the ground-truth energy attached. No outcome is dropped.
#[instrument(skip_all, name = "quality_gate_filter")]
pub fn run(
    outcomes: &[RelaxationOutcome],
    config: &QualityGateConfig,
    reporter: &ProgressReporter,
) -> Result<GateResult, RefineError> {
    if outcomes.is_empty() {
        return Err(RefineError::EmptyInput {
            stage: "quality gate",
        });
    }

    let energy_changes: Vec<f64> = outcomes.iter().map(RelaxationOutcome::energy_change).collect();
    let diagnostics = find_threshold(&energy_changes, config)?;
    let threshold = diagnostics.valley;

    let mut structures = Vec::with_capacity(outcomes.len());
    let mut decisions = Vec::with_capacity(outcomes.len());
    for (index, (outcome, &change)) in outcomes.iter().zip(&energy_changes).enumerate() {
        if change > threshold {
            let relaxed = match outcome.relaxed.energy() {
                Some(_) => outcome.relaxed.clone(),
                None => attach(
                    &SinglePoint::new(outcome.predicted_final),
                    outcome.relaxed.clone(),
                )
                .map_err(|source| RefineError::EvaluationFailed { index, source })?,
            };
            structures.push(relaxed);
            decisions.push(GateDecision::Accepted);
        } else {
            let fallback = attach(
                &SinglePoint::new(outcome.reference_energy),
                outcome.unrelaxed.clone().without_constraints(),
            )
            .map_err(|source| RefineError::EvaluationFailed { index, source })?;
            structures.push(fallback);
            decisions.push(GateDecision::Rejected);
        }
    }

    let result = GateResult {
        structures,
        decisions,
        energy_changes,
        diagnostics,
    };
    info!(
        threshold,
        accepted = result.accepted_count(),
        rejected = result.rejected_count(),
        "Quality gate applied."
    );
    reporter.message(format!(
        "Quality gate threshold {threshold:.4} eV: {} accepted, {} reset",
        result.accepted_count(),
        result.rejected_count()
    ));
    Ok(result)
}

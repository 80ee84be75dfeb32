use crate::core::descriptors::cutoff::CutoffDescriptor;
use crate::core::descriptors::precomputed::PrecomputedDescriptors;
use crate::core::descriptors::traits::GraphDescriptor;
use crate::core::models::structure::Structure;
use crate::core::models::template::Template;
use crate::engine::config::{
    DescriptorConfig, DescriptorKind, EnergyWindowConfig, QualityGateConfig, RefineConfig,
};
use crate::engine::context::{GraphContext, batch_indices};
use crate::engine::error::RefineError;
use crate::engine::filters::outlier::{GateResult, RelaxationOutcome};
use crate::engine::filters::{connectivity, energy_window, fingerprint_dedup, outlier};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Structure counts entering and leaving one filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: &'static str,
    pub input: usize,
    pub output: usize,
}

impl StageReport {
    fn new(stage: &'static str, input: usize, output: usize) -> Self {
        Self {
            stage,
            input,
            output,
        }
    }

    pub fn dropped(&self) -> usize {
        self.input - self.output
    }
}

#[derive(Debug, Clone)]
pub struct ScreenResult {
    pub structures: Vec<Structure>,
    pub energy_window: StageReport,
    pub deduplication: StageReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeOptions {
    /// Drop structures whose cluster is split after deduplication.
    pub joined_filter: bool,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self {
            joined_filter: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FinalizeResult {
    pub structures: Vec<Structure>,
    pub deduplication: StageReport,
    pub connectivity: Option<StageReport>,
}

/// The descriptor backend selected by `config`.
///
/// `precomputed` holds whatever descriptor values arrived with the batch; it is only used by the
/// precomputed backend.
pub fn descriptor_for(
    config: &DescriptorConfig,
    precomputed: PrecomputedDescriptors,
) -> Box<dyn GraphDescriptor> {
    match config.kind {
        DescriptorKind::Precomputed => Box::new(precomputed),
        DescriptorKind::Cutoff => Box::new(CutoffDescriptor::new(config.cutoff.scale)),
    }
}

/// Survivors of a single filter together with its counts.
#[derive(Debug, Clone)]
pub struct StageResult {
    pub structures: Vec<Structure>,
    pub report: StageReport,
}

/// Keeps structures within the configured energy window of the batch minimum.
#[instrument(skip_all, name = "energy_window_stage")]
pub fn energy_window(
    structures: Vec<Structure>,
    config: &EnergyWindowConfig,
    reporter: &ProgressReporter,
) -> Result<StageResult, RefineError> {
    let input = structures.len();
    let kept = energy_window::run(structures, config.threshold, reporter)?;
    let report = StageReport::new("energy window", input, kept.len());
    Ok(StageResult {
        structures: kept,
        report,
    })
}

/// Keeps the lowest-energy structure of every fingerprint, sorted by energy.
#[instrument(skip_all, name = "deduplication_stage")]
pub fn deduplicate(
    structures: Vec<Structure>,
    template: &Template,
    descriptor: &dyn GraphDescriptor,
    reporter: &ProgressReporter,
) -> Result<StageResult, RefineError> {
    let indices = batch_indices(template, &structures, "deduplication")?;
    let context = GraphContext::new(template, descriptor, &indices, reporter);
    let input = structures.len();
    let unique = fingerprint_dedup::run(structures, &context)?;
    let report = StageReport::new("deduplication", input, unique.len());
    Ok(StageResult {
        structures: unique,
        report,
    })
}

/// Screens raw search output: energy window, then one representative per fingerprint.
#[instrument(skip_all, name = "screen_workflow")]
pub fn screen(
    structures: Vec<Structure>,
    template: &Template,
    descriptor: &dyn GraphDescriptor,
    config: &RefineConfig,
    reporter: &ProgressReporter,
) -> Result<ScreenResult, RefineError> {
    reporter.report(Progress::PhaseStart { name: "Screening" });
    info!(
        structures = structures.len(),
        descriptor = descriptor.name(),
        "Starting screening."
    );

    let windowed = energy_window(structures, &config.energy_window, reporter)?;
    if windowed.structures.is_empty() {
        reporter.report(Progress::PhaseFinish);
        return Ok(ScreenResult {
            structures: windowed.structures,
            energy_window: windowed.report,
            deduplication: StageReport::new("deduplication", 0, 0),
        });
    }

    let unique = deduplicate(windowed.structures, template, descriptor, reporter)?;

    reporter.report(Progress::PhaseFinish);
    info!(kept = unique.structures.len(), "Screening complete.");
    Ok(ScreenResult {
        structures: unique.structures,
        energy_window: windowed.report,
        deduplication: unique.report,
    })
}

/// Screens surrogate relaxation outcomes, see [`outlier::run`].
#[instrument(skip_all, name = "quality_gate_workflow")]
pub fn quality_gate(
    outcomes: &[RelaxationOutcome],
    config: &QualityGateConfig,
    reporter: &ProgressReporter,
) -> Result<GateResult, RefineError> {
    reporter.report(Progress::PhaseStart {
        name: "Quality Gate",
    });
    let result = outlier::run(outcomes, config, reporter)?;
    reporter.report(Progress::StageSummary {
        stage: "quality gate",
        input: outcomes.len(),
        output: result.structures.len(),
    });
    reporter.report(Progress::PhaseFinish);
    Ok(result)
}

/// Reduces refined structures to the final set: deduplication, then connectivity.
#[instrument(skip_all, name = "finalize_workflow")]
pub fn finalize(
    structures: Vec<Structure>,
    template: &Template,
    descriptor: &dyn GraphDescriptor,
    options: &FinalizeOptions,
    reporter: &ProgressReporter,
) -> Result<FinalizeResult, RefineError> {
    reporter.report(Progress::PhaseStart { name: "Finalizing" });
    info!(
        structures = structures.len(),
        joined_filter = options.joined_filter,
        "Starting finalization."
    );

    let unique = deduplicate(structures, template, descriptor, reporter)?;
    let deduplication = unique.report;
    let unique = unique.structures;

    let (structures, connectivity) = if options.joined_filter {
        let indices = batch_indices(template, &unique, "connectivity")?;
        let context = GraphContext::new(template, descriptor, &indices, reporter);
        let unique_len = unique.len();
        let joined = connectivity::run(unique, &context)?;
        let report = StageReport::new("connectivity", unique_len, joined.len());
        (joined, Some(report))
    } else {
        (unique, None)
    };

    reporter.report(Progress::PhaseFinish);
    info!(kept = structures.len(), "Finalization complete.");
    Ok(FinalizeResult {
        structures,
        deduplication,
        connectivity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::traits::Fingerprint;
    use crate::core::graph::bond_matrix::BondMatrix;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn template() -> Template {
        Template::fcc111("Pt", (2, 2, 2), 3.92, 10.0).unwrap()
    }

    fn candidate(template: &Template, id: usize, energy: f64) -> Structure {
        let top = template.top_layer_height().unwrap();
        template
            .structure()
            .clone()
            .with_atom(Atom::new("Pt", Point3::new(0.1 * id as f64, 0.0, top + 2.3)))
            .with_atom(Atom::new("Pt", Point3::new(0.1 * id as f64, 2.0, top + 2.3)))
            .with_energy(energy)
    }

    #[test]
    fn screen_reports_counts_per_stage() {
        let template = template();
        let mut store = PrecomputedDescriptors::new();
        let specs = [("a", 0.3), ("a", 0.1), ("b", 0.6), ("c", 1.7)];
        let structures: Vec<Structure> = specs
            .iter()
            .enumerate()
            .map(|(id, (fp, energy))| {
                let s = candidate(&template, id, *energy);
                store.insert(&s, Some(Fingerprint::new(*fp)), None);
                s
            })
            .collect();

        let result = screen(
            structures,
            &template,
            &store,
            &RefineConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.energy_window, StageReport::new("energy window", 4, 3));
        assert_eq!(result.deduplication, StageReport::new("deduplication", 3, 2));
        assert_eq!(result.deduplication.dropped(), 1);
        let energies: Vec<f64> = result.structures.iter().filter_map(Structure::energy).collect();
        assert_eq!(energies, vec![0.1, 0.6]);
    }

    #[test]
    fn finalize_can_skip_the_connectivity_filter() {
        let template = template();
        let mut store = PrecomputedDescriptors::new();
        let split = BondMatrix::zeros(6);
        let structures: Vec<Structure> = (0..3)
            .map(|id| {
                let s = candidate(&template, id, id as f64);
                store.insert(&s, Some(Fingerprint::new(format!("fp{id}"))), Some(split.clone()));
                s
            })
            .collect();

        let reporter = ProgressReporter::new();
        let filtered = finalize(
            structures.clone(),
            &template,
            &store,
            &FinalizeOptions::default(),
            &reporter,
        )
        .unwrap();
        assert!(filtered.structures.is_empty());
        assert_eq!(
            filtered.connectivity,
            Some(StageReport::new("connectivity", 3, 0))
        );

        let unfiltered = finalize(
            structures,
            &template,
            &store,
            &FinalizeOptions {
                joined_filter: false,
            },
            &reporter,
        )
        .unwrap();
        assert_eq!(unfiltered.structures.len(), 3);
        assert_eq!(unfiltered.connectivity, None);
    }

    #[test]
    fn descriptor_for_selects_the_configured_backend() {
        let mut config = DescriptorConfig::default();
        assert_eq!(
            descriptor_for(&config, PrecomputedDescriptors::new()).name(),
            "precomputed"
        );
        config.kind = DescriptorKind::Cutoff;
        assert_eq!(
            descriptor_for(&config, PrecomputedDescriptors::new()).name(),
            "cutoff"
        );
    }

    #[test]
    fn deduplicate_rejects_an_empty_batch() {
        let result = deduplicate(
            Vec::new(),
            &template(),
            &PrecomputedDescriptors::new(),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(RefineError::EmptyInput {
                stage: "deduplication"
            })
        ));
    }

    #[test]
    fn energy_window_stage_counts_dropped_structures() {
        let template = template();
        let structures = vec![
            candidate(&template, 0, -3.0),
            candidate(&template, 1, -2.5),
            candidate(&template, 2, -1.0),
        ];
        let result = energy_window(
            structures,
            &EnergyWindowConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(result.report, StageReport::new("energy window", 3, 2));
        assert_eq!(result.report.dropped(), 1);
    }
}

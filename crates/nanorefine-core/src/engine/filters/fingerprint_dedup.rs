use crate::core::descriptors::traits::Fingerprint;
use crate::core::models::structure::Structure;
use crate::engine::context::GraphContext;
use crate::engine::error::RefineError;
use crate::engine::filters::attached_energies;
use crate::engine::progress::Progress;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Collapses structures with equal fingerprints to their lowest-energy member.
///
/// Within a group the first structure in input order wins ties. The representatives are returned
/// sorted by ascending energy; representatives of equal energy keep the order in which their
/// groups were first seen.
#[instrument(skip_all, name = "fingerprint_dedup_filter")]
pub fn run(
    structures: Vec<Structure>,
    context: &GraphContext,
) -> Result<Vec<Structure>, RefineError> {
    if structures.is_empty() {
        return Err(RefineError::EmptyInput {
            stage: "deduplication",
        });
    }

    let energies = attached_energies(&structures)?;
    let fingerprints = fingerprints(&structures, context)?;

    let mut best_of_group: HashMap<&Fingerprint, usize> = HashMap::new();
    let mut group_order: Vec<&Fingerprint> = Vec::new();
    for (index, fingerprint) in fingerprints.iter().enumerate() {
        match best_of_group.entry(fingerprint) {
            Entry::Vacant(slot) => {
                group_order.push(fingerprint);
                slot.insert(index);
            }
            Entry::Occupied(mut slot) => {
                if energies[index] < energies[*slot.get()] {
                    slot.insert(index);
                }
            }
        }
    }

    let mut representatives: Vec<usize> = group_order
        .iter()
        .map(|fingerprint| best_of_group[fingerprint])
        .collect();
    representatives.sort_by(|&a, &b| energies[a].total_cmp(&energies[b]));
    debug!(groups = representatives.len(), "Fingerprint groups resolved.");

    let input = structures.len();
    let mut slots: Vec<Option<Structure>> = structures.into_iter().map(Some).collect();
    let kept: Vec<Structure> = representatives
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();

    info!(
        kept = kept.len(),
        dropped = input - kept.len(),
        "Duplicate structures removed."
    );
    context.reporter.report(Progress::StageSummary {
        stage: "deduplication",
        input,
        output: kept.len(),
    });
    Ok(kept)
}

/// Fingerprints of `structures`, in input order.
pub fn fingerprints(
    structures: &[Structure],
    context: &GraphContext,
) -> Result<Vec<Fingerprint>, RefineError> {
    context.reporter.report(Progress::TaskStart {
        total_steps: structures.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = structures.iter();

    #[cfg(feature = "parallel")]
    let iterator = structures.par_iter();

    let fingerprints = iterator
        .map(|structure| {
            let fingerprint =
                context
                    .descriptor
                    .fingerprint(structure, context.template, context.indices);
            context.reporter.report(Progress::TaskIncrement);
            fingerprint
        })
        .collect::<Result<Vec<_>, _>>();

    context.reporter.report(Progress::TaskFinish);
    Ok(fingerprints?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::precomputed::PrecomputedDescriptors;
    use crate::core::models::template::Template;
    use crate::engine::context::batch_indices;
    use crate::engine::filters::test_support::{fingerprinted, template};
    use crate::engine::progress::ProgressReporter;

    fn dedup(
        template: &Template,
        structures: Vec<Structure>,
        store: &PrecomputedDescriptors,
    ) -> Result<Vec<Structure>, RefineError> {
        let reporter = ProgressReporter::new();
        let indices = batch_indices(template, &structures, "deduplication")?;
        let context = GraphContext::new(template, store, &indices, &reporter);
        run(structures, &context)
    }

    #[test]
    fn keeps_the_lowest_energy_member_of_each_group_sorted_by_energy() {
        let template = template();
        let (structures, store) = fingerprinted(
            &template,
            &[("a", 0.4), ("b", 0.2), ("a", -0.1), ("c", 0.9), ("b", 0.5)],
        );

        let kept = dedup(&template, structures.clone(), &store).unwrap();
        assert_eq!(kept, vec![
            structures[2].clone(),
            structures[1].clone(),
            structures[3].clone()
        ]);
    }

    #[test]
    fn output_length_equals_the_number_of_distinct_fingerprints() {
        let template = template();
        let (structures, store) = fingerprinted(
            &template,
            &[("x", 1.0), ("y", 2.0), ("x", 3.0), ("x", 0.5), ("z", 0.0), ("y", 2.5)],
        );
        let kept = dedup(&template, structures, &store).unwrap();
        assert_eq!(kept.len(), 3);
        assert!(kept.windows(2).all(|w| w[0].energy() <= w[1].energy()));
    }

    #[test]
    fn no_representative_is_dominated_within_its_group() {
        let template = template();
        let specs = [("p", 0.3), ("q", 0.1), ("p", 0.2), ("q", 0.4), ("p", 0.25)];
        let (structures, store) = fingerprinted(&template, &specs);
        let kept = dedup(&template, structures.clone(), &store).unwrap();

        for representative in &kept {
            let position = structures.iter().position(|s| s == representative).unwrap();
            let group = specs[position].0;
            let energy = representative.energy().unwrap();
            assert!(
                specs
                    .iter()
                    .filter(|(fp, _)| *fp == group)
                    .all(|(_, e)| *e >= energy)
            );
        }
    }

    #[test]
    fn energy_ties_are_won_by_the_first_structure() {
        let template = template();
        let (structures, store) = fingerprinted(&template, &[("a", 0.0), ("a", 0.0), ("a", 0.0)]);
        let kept = dedup(&template, structures.clone(), &store).unwrap();
        assert_eq!(kept, vec![structures[0].clone()]);
    }

    #[test]
    fn survivors_keep_their_energies() {
        let template = template();
        let (structures, store) = fingerprinted(&template, &[("a", -2.5), ("b", 7.25)]);
        let kept = dedup(&template, structures, &store).unwrap();
        let energies: Vec<f64> = kept.iter().filter_map(Structure::energy).collect();
        assert_eq!(energies, vec![-2.5, 7.25]);
    }

    #[test]
    fn missing_fingerprints_surface_as_descriptor_errors() {
        let template = template();
        let (mut structures, store) = fingerprinted(&template, &[("a", 0.0)]);
        let (unknown, _) = fingerprinted(&template, &[("a", 0.0), ("b", 1.0)]);
        structures.push(unknown[1].clone());

        assert!(matches!(
            dedup(&template, structures, &store),
            Err(RefineError::Descriptor { .. })
        ));
    }

    #[test]
    fn missing_energies_fail_before_grouping() {
        let template = template();
        let (mut structures, store) = fingerprinted(&template, &[("a", 0.0), ("a", 1.0)]);
        structures[1] = structures[1].clone().without_energy();
        assert!(matches!(
            dedup(&template, structures, &store),
            Err(RefineError::MissingEnergy { index: 1 })
        ));
    }

    #[test]
    fn empty_input_fails() {
        let template = template();
        let store = PrecomputedDescriptors::new();
        let indices = crate::core::graph::indices::GraphIndexSet::new(&template, 9).unwrap();
        let reporter = ProgressReporter::new();
        let context = GraphContext::new(&template, &store, &indices, &reporter);
        assert!(matches!(
            run(Vec::new(), &context),
            Err(RefineError::EmptyInput { .. })
        ));
    }
}

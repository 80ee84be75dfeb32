use crate::core::graph::bond_matrix::BondMatrix;
use crate::core::graph::indices::GraphIndexSet;
use crate::core::graph::traversal::Adjacency;
use crate::core::models::structure::Structure;
use crate::engine::context::GraphContext;
use crate::engine::error::RefineError;
use crate::engine::progress::Progress;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Largest bond-graph distance at which two cluster atoms still count as neighbours.
const EXTENDED_NEIGHBOR_DISTANCE: usize = 2;

/// Whether the cluster sites of `bonds` form a single body.
///
/// Two cluster atoms are extended neighbours when their shortest path through the full bond
/// graph, support sites included, is at most two hops. The cluster is joined when every cluster
/// atom is reachable from the first one over extended-neighbour links.
pub fn is_joined(bonds: &BondMatrix, indices: &GraphIndexSet) -> Result<bool, RefineError> {
    bonds.check_dim(indices.len())?;
    let clusters: Vec<usize> = indices.cluster_sites().collect();
    if clusters.is_empty() {
        return Err(RefineError::PreconditionViolation(
            "connectivity needs at least one cluster atom".to_string(),
        ));
    }

    let bond_graph = bonds.adjacency();
    let mut extended = Adjacency::new(clusters.len());
    for (a, &site) in clusters.iter().enumerate() {
        let distances = bond_graph.shortest_path_lengths(site, &clusters);
        for (b, distance) in distances.into_iter().enumerate() {
            if b != a && distance.is_some_and(|d| d <= EXTENDED_NEIGHBOR_DISTANCE) {
                extended.add_arc(a, b);
            }
        }
    }

    Ok(extended.reachable_from(0).into_iter().all(|reached| reached))
}

/// Classifies one structure using the bond matrix from the context's descriptor.
pub fn classify(structure: &Structure, context: &GraphContext) -> Result<bool, RefineError> {
    let bonds = context
        .descriptor
        .bond_matrix(structure, context.template, context.indices)?;
    is_joined(&bonds, context.indices)
}

/// Keeps the structures whose cluster is joined, in input order.
#[instrument(skip_all, name = "connectivity_filter")]
pub fn run(
    structures: Vec<Structure>,
    context: &GraphContext,
) -> Result<Vec<Structure>, RefineError> {
    if structures.is_empty() {
        return Err(RefineError::EmptyInput {
            stage: "connectivity",
        });
    }

    context.reporter.report(Progress::TaskStart {
        total_steps: structures.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = structures.iter();

    #[cfg(feature = "parallel")]
    let iterator = structures.par_iter();

    let verdicts = iterator
        .map(|structure| {
            let verdict = classify(structure, context);
            context.reporter.report(Progress::TaskIncrement);
            verdict
        })
        .collect::<Result<Vec<bool>, _>>();
    context.reporter.report(Progress::TaskFinish);
    let verdicts = verdicts?;

    let input = structures.len();
    let kept: Vec<Structure> = structures
        .into_iter()
        .zip(&verdicts)
        .filter_map(|(structure, &joined)| joined.then_some(structure))
        .collect();

    for (index, _) in verdicts.iter().enumerate().filter(|(_, joined)| !**joined) {
        debug!(index, "Cluster is split; structure dropped.");
    }
    info!(
        kept = kept.len(),
        dropped = input - kept.len(),
        "Connectivity classification applied."
    );
    context.reporter.report(Progress::StageSummary {
        stage: "connectivity",
        input,
        output: kept.len(),
    });
    Ok(kept)
}

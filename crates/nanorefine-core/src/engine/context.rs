use super::error::RefineError;
use super::progress::ProgressReporter;
use crate::core::descriptors::traits::GraphDescriptor;
use crate::core::graph::indices::GraphIndexSet;
use crate::core::models::structure::Structure;
use crate::core::models::template::Template;

/// Everything the graph-based filters share for one batch.
#[derive(Clone, Copy)]
pub struct GraphContext<'a> {
    pub template: &'a Template,
    pub descriptor: &'a dyn GraphDescriptor,
    pub indices: &'a GraphIndexSet,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> GraphContext<'a> {
    pub fn new(
        template: &'a Template,
        descriptor: &'a dyn GraphDescriptor,
        indices: &'a GraphIndexSet,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            template,
            descriptor,
            indices,
            reporter,
        }
    }
}

/// Derives the graph index set of a batch from its first structure.
///
/// Every structure in the batch must have the same atom count, at least that of the template.
pub fn batch_indices(
    template: &Template,
    structures: &[Structure],
    stage: &'static str,
) -> Result<GraphIndexSet, RefineError> {
    let first = structures.first().ok_or(RefineError::EmptyInput { stage })?;
    let n_atoms = first.len();

    if let Some((index, structure)) = structures
        .iter()
        .enumerate()
        .find(|(_, structure)| structure.len() != n_atoms)
    {
        return Err(RefineError::PreconditionViolation(format!(
            "structure {index} has {} atoms but the batch expects {n_atoms}",
            structure.len()
        )));
    }

    Ok(GraphIndexSet::new(template, n_atoms)?)
}

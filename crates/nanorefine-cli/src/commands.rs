pub mod energy_filter;
pub mod finalize;
pub mod graph_filter;
pub mod quality_gate;

use crate::error::{CliError, Result};
use nanorefine::core::descriptors::precomputed::PrecomputedDescriptors;
use nanorefine::core::io::batch::{BatchParts, JsonFile, StructureBatch};
use nanorefine::core::models::structure::Structure;
use nanorefine::core::models::template::Template;
use nanorefine::engine::error::RefineError;
use std::path::{Path, PathBuf};
use tracing::info;

fn load_batch(path: &Path) -> Result<BatchParts> {
    info!("Loading structure batch from {:?}", path);
    let parts = StructureBatch::read_from_path(path)?.into_parts()?;
    info!(
        structures = parts.structures.len(),
        precomputed = parts.descriptors.len(),
        "Batch loaded."
    );
    Ok(parts)
}

/// Pools the batches at `paths` in order. Every batch must be built on the same template.
fn load_batches(paths: &[PathBuf]) -> Result<BatchParts> {
    let (first, rest) = paths
        .split_first()
        .ok_or_else(|| CliError::Argument("No input batch given.".to_string()))?;

    let mut pool = load_batch(first)?;
    for path in rest {
        let parts = load_batch(path)?;
        if parts.template != pool.template {
            return Err(RefineError::PreconditionViolation(format!(
                "batch {:?} is built on a different template than {:?}",
                path, first
            ))
            .into());
        }
        pool.structures.extend(parts.structures);
        pool.descriptors.merge(parts.descriptors);
    }

    if !rest.is_empty() {
        info!(
            batches = paths.len(),
            structures = pool.structures.len(),
            "Input batches pooled."
        );
    }
    Ok(pool)
}

/// Writes `structures` as a batch, carrying over any descriptor values known for them.
fn write_batch(
    path: &Path,
    template: &Template,
    structures: &[Structure],
    descriptors: Option<&PrecomputedDescriptors>,
) -> Result<()> {
    info!("Writing {} structure(s) to {:?}", structures.len(), path);
    StructureBatch::from_parts(template, structures, descriptors).write_to_path(path)?;
    Ok(())
}

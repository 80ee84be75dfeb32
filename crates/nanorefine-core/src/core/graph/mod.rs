//! # Graph Module
//!
//! Graph primitives shared by the descriptor-based filters.
//!
//! Graph sites are addressed by plain integer indices into an adjacency arena; no node owns a
//! reference to another, so cyclic neighbourhoods need no special handling.
//!
//! - [`indices`] - The graph index scheme: top-layer support atoms followed by cluster atoms
//! - [`bond_matrix`] - Binary site adjacency as delivered by a descriptor service
//! - [`traversal`] - Adjacency arena, breadth-first shortest paths and reachability

pub mod bond_matrix;
pub mod indices;
pub mod traversal;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Bond matrix must be square, got {rows} rows with a row of length {columns}")]
    NotSquare { rows: usize, columns: usize },

    #[error("Bond matrix dimension {found} does not match the {expected} graph indices")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Structure has {atoms} atoms, fewer than the {template} atoms of the template")]
    AtomCountBelowTemplate { atoms: usize, template: usize },

    #[error("Graph site {index} is out of range for a graph of {len} sites")]
    SiteOutOfRange { index: usize, len: usize },
}

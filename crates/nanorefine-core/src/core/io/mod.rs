//! # I/O Module
//!
//! File formats exchanged with the external stages of the pipeline.
//!
//! - [`batch`] - JSON batches: a template, its structures and optional precomputed descriptors
//! - [`report`] - CSV reports of quality-gate decisions

pub mod batch;
pub mod report;

use crate::core::graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    #[error("Invalid bond matrix on structure {index}: {source}")]
    BondMatrix { index: usize, source: GraphError },
}

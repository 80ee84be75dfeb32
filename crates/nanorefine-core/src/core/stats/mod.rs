//! # Statistics Module
//!
//! One-dimensional statistics used by the relaxation quality gate.
//!
//! - [`summary`] - Sample mean and standard deviation
//! - [`kde`] - Gaussian kernel density estimate with an analytic derivative
//! - [`minimize`] - Deterministic seeded local minimisation of a smooth scalar function

pub mod kde;
pub mod minimize;
pub mod summary;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("At least {required} samples are required, got {found}")]
    TooFewSamples { required: usize, found: usize },

    #[error("Samples have zero spread (standard deviation {std_dev:e})")]
    ZeroVariance { std_dev: f64 },

    #[error("Samples contain a non-finite value at index {index}")]
    NonFinite { index: usize },

    #[error("Bandwidth must be positive and finite, got {0}")]
    InvalidBandwidth(f64),

    #[error("Search step must be positive and finite, got {0}")]
    InvalidStep(f64),
}

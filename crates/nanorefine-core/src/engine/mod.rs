//! # Engine Module
//!
//! The filtering engine of the refinement pipeline.
//!
//! ## Overview
//!
//! Each filter is a task over a batch of candidate structures: it either keeps, drops or (for the
//! quality gate) substitutes structures, and never edits an attached energy in place. Filters that
//! need graph descriptors share a [`context::GraphContext`] built once per batch.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Thresholds and descriptor settings with validating builders
//! - **Context** ([`context`]) - Template, graph index set and descriptor backend for one batch
//! - **Filters** ([`filters`]) - Energy window, fingerprint deduplication, connectivity
//!   classification and the bimodal relaxation quality gate
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - The batch-level error taxonomy

pub mod config;
pub mod context;
pub mod error;
pub mod filters;
pub mod progress;

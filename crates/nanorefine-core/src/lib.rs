//! # NanoRefine Core Library
//!
//! Refinement filters for global-optimization searches of supported nanoclusters. A structure
//! search proposes thousands of candidate geometries; this library decides which of them are
//! physically meaningful, non-redundant and correctly relaxed before they are forwarded to
//! expensive high-fidelity evaluation.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Template`), the graph
//!   primitives used for connectivity analysis, descriptor and calculator capability traits,
//!   kernel density estimation and batch-file I/O.
//!
//! - **[`engine`]: The Logic Core.** The four refinement filters (energy window, fingerprint
//!   deduplication, connectivity classification and the bimodal relaxation quality gate), together
//!   with their configuration, error taxonomy and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Composes the filters into the stages of the refinement
//!   pipeline. External steps (structure search, surrogate relaxation, ab-initio refinement) happen
//!   between these stages and are the caller's responsibility.

pub mod core;
pub mod engine;
pub mod workflows;

//! # Workflows Module
//!
//! Entry points that chain the engine's filters into the stages of the refinement pipeline.
//!
//! The pipeline alternates between filtering done here and evaluations done by external tools
//! (surrogate relaxation, high-fidelity refinement). Each stage function covers the filtering
//! between two such external steps:
//!
//! - [`refine::energy_window`] / [`refine::deduplicate`] - The single filters, for stand-alone runs
//! - [`refine::screen`] - Energy window, then fingerprint deduplication of the raw search output
//! - [`refine::quality_gate`] - Bimodal screening of surrogate relaxation outcomes
//! - [`refine::finalize`] - Deduplication of refined structures, then connectivity classification

pub mod refine;

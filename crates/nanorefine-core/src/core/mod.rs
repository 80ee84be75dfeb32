//! # Core Module
//!
//! Fundamental building blocks for refining supported-nanocluster structure sets.
//!
//! ## Architecture
//!
//! - **Structural Representation** ([`models`]) - Atoms, periodic structures, constraints and the
//!   surface template clusters are adsorbed on
//! - **Graph Primitives** ([`graph`]) - Graph index scheme, bond matrices, breadth-first shortest
//!   paths and reachability over an index-addressed adjacency arena
//! - **Descriptors** ([`descriptors`]) - The graph-descriptor capability (fingerprints and bond
//!   matrices) and its adapters
//! - **Calculators** ([`calculators`]) - The single energy-evaluation capability shared by
//!   surrogate and ground-truth backends
//! - **Statistics** ([`stats`]) - Sample statistics, Gaussian kernel density estimation and a
//!   deterministic one-dimensional local minimiser
//! - **File I/O** ([`io`]) - JSON structure batches and CSV quality-gate reports
//! - **Utilities** ([`utils`]) - Static element data

pub mod calculators;
pub mod descriptors;
pub mod graph;
pub mod io;
pub mod models;
pub mod stats;
pub mod utils;

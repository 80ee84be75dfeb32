//! # Descriptors Module
//!
//! Graph descriptors of supported structures: the site-occupation [`traits::Fingerprint`] used to
//! group equivalent structures and the [`crate::core::graph::bond_matrix::BondMatrix`] used to
//! judge cluster connectivity.
//!
//! The filters only see the [`traits::GraphDescriptor`] capability. Two backends implement it:
//!
//! - [`precomputed`] - Values produced by an external descriptor service and shipped with a batch
//! - [`cutoff`] - A covalent-radius neighbour cutoff computed in-process

pub mod cutoff;
pub mod precomputed;
pub mod traits;

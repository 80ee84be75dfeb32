use crate::core::graph::GraphError;
use crate::core::graph::bond_matrix::BondMatrix;
use crate::core::graph::indices::GraphIndexSet;
use crate::core::models::structure::Structure;
use crate::core::models::template::Template;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Canonical site-occupation pattern of a structure relative to its template.
///
/// Fingerprints are opaque: the only meaningful operations are equality, hashing and ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Surface site classification scheme used when building fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteMapping {
    #[default]
    Fcc111,
}

impl SiteMapping {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteMapping::Fcc111 => "fcc111",
        }
    }
}

/// Options a descriptor backend is configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorSettings {
    pub site_mapping: SiteMapping,
    /// Extra sample points placed around each site.
    pub n_points: usize,
    /// Confinement environment the sites are evaluated in, if any.
    pub environment: Option<Structure>,
}

impl Default for DescriptorSettings {
    fn default() -> Self {
        Self {
            site_mapping: SiteMapping::Fcc111,
            n_points: 0,
            environment: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("No precomputed {kind} for the requested structure")]
    MissingPrecomputed { kind: &'static str },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("No covalent radius is tabulated for element '{0}'")]
    UnknownElement(String),

    #[error("Graph indices expect {expected} atoms but the structure has {found}")]
    AtomCountMismatch { expected: usize, found: usize },

    #[error("Descriptor backend '{backend}' failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

/// The graph-descriptor capability consumed by the fingerprint and connectivity filters.
///
/// Implementations must be deterministic: structures with the same coordinates, elements and cell
/// yield equal fingerprints and equal bond matrices.
pub trait GraphDescriptor: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    fn settings(&self) -> &DescriptorSettings;

    /// Site-occupation fingerprint of `structure` over the graph sites in `indices`.
    fn fingerprint(
        &self,
        structure: &Structure,
        template: &Template,
        indices: &GraphIndexSet,
    ) -> Result<Fingerprint, DescriptorError>;

    /// Symmetric 0/1 adjacency of `structure` over the graph sites in `indices`.
    fn bond_matrix(
        &self,
        structure: &Structure,
        template: &Template,
        indices: &GraphIndexSet,
    ) -> Result<BondMatrix, DescriptorError>;
}

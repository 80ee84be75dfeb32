use super::traits::{DescriptorError, DescriptorSettings, Fingerprint, GraphDescriptor};
use crate::core::graph::bond_matrix::BondMatrix;
use crate::core::graph::indices::GraphIndexSet;
use crate::core::models::structure::{GeometryKey, Structure};
use crate::core::models::template::Template;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct Entry {
    fingerprint: Option<Fingerprint>,
    bond_matrix: Option<BondMatrix>,
}

/// Descriptor values computed ahead of time by an external descriptor service.
///
/// Entries are looked up by exact geometry, so a structure evaluated by the service matches its
/// entry regardless of the energy or constraints attached since.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedDescriptors {
    settings: DescriptorSettings,
    entries: HashMap<GeometryKey, Entry>,
}

impl PrecomputedDescriptors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the descriptor values of `structure`. `None` leaves a previously recorded value in place.
    pub fn insert(
        &mut self,
        structure: &Structure,
        fingerprint: Option<Fingerprint>,
        bond_matrix: Option<BondMatrix>,
    ) {
        let entry = self.entries.entry(structure.geometry_key()).or_default();
        if fingerprint.is_some() {
            entry.fingerprint = fingerprint;
        }
        if bond_matrix.is_some() {
            entry.bond_matrix = bond_matrix;
        }
    }

    /// Takes over every entry of `other`, with the same fill-in rule as [`Self::insert`].
    pub fn merge(&mut self, other: PrecomputedDescriptors) {
        for (key, incoming) in other.entries {
            let entry = self.entries.entry(key).or_default();
            if incoming.fingerprint.is_some() {
                entry.fingerprint = incoming.fingerprint;
            }
            if incoming.bond_matrix.is_some() {
                entry.bond_matrix = incoming.bond_matrix;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fingerprint_of(&self, structure: &Structure) -> Option<&Fingerprint> {
        self.entries
            .get(&structure.geometry_key())
            .and_then(|entry| entry.fingerprint.as_ref())
    }

    pub fn bond_matrix_of(&self, structure: &Structure) -> Option<&BondMatrix> {
        self.entries
            .get(&structure.geometry_key())
            .and_then(|entry| entry.bond_matrix.as_ref())
    }
}

impl GraphDescriptor for PrecomputedDescriptors {
    fn name(&self) -> &'static str {
        "precomputed"
    }

    fn settings(&self) -> &DescriptorSettings {
        &self.settings
    }

    fn fingerprint(
        &self,
        structure: &Structure,
        _template: &Template,
        _indices: &GraphIndexSet,
    ) -> Result<Fingerprint, DescriptorError> {
        self.fingerprint_of(structure)
            .cloned()
            .ok_or(DescriptorError::MissingPrecomputed {
                kind: "fingerprint",
            })
    }

    fn bond_matrix(
        &self,
        structure: &Structure,
        _template: &Template,
        indices: &GraphIndexSet,
    ) -> Result<BondMatrix, DescriptorError> {
        let matrix = self
            .bond_matrix_of(structure)
            .cloned()
            .ok_or(DescriptorError::MissingPrecomputed {
                kind: "bond matrix",
            })?;
        matrix.check_dim(indices.len())?;
        Ok(matrix)
    }
}

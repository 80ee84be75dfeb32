//! Filtering tasks of the refinement pipeline.
//!
//! The energy window and the fingerprint deduplication narrow the candidate pool before any
//! expensive evaluation; the quality gate screens surrogate relaxations; the connectivity
//! classifier drops refined structures whose cluster has fallen apart.

pub mod connectivity;
pub mod energy_window;
pub mod fingerprint_dedup;
pub mod outlier;

use super::error::RefineError;
use crate::core::models::structure::Structure;

/// Attached energies of `structures`, failing on the first structure without one.
pub(crate) fn attached_energies(structures: &[Structure]) -> Result<Vec<f64>, RefineError> {
    structures
        .iter()
        .enumerate()
        .map(|(index, structure)| {
            structure
                .energy()
                .ok_or(RefineError::MissingEnergy { index })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::descriptors::precomputed::PrecomputedDescriptors;
    use crate::core::descriptors::traits::Fingerprint;
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::Structure;
    use crate::core::models::template::Template;
    use nalgebra::Point3;

    pub fn template() -> Template {
        Template::fcc111("Pt", (2, 2, 2), 3.92, 10.0).unwrap()
    }

    /// A structure with one distinct adatom per `id`, so every id has its own geometry.
    pub fn candidate(template: &Template, id: usize, energy: f64) -> Structure {
        let top = template.top_layer_height().unwrap();
        template
            .structure()
            .clone()
            .with_atom(Atom::new("O", Point3::new(0.1 * id as f64, 0.0, top + 2.0)))
            .with_energy(energy)
    }

    /// Candidates with the given `(fingerprint, energy)` pairs and a store that knows them.
    pub fn fingerprinted(
        template: &Template,
        specs: &[(&str, f64)],
    ) -> (Vec<Structure>, PrecomputedDescriptors) {
        let mut store = PrecomputedDescriptors::new();
        let structures = specs
            .iter()
            .enumerate()
            .map(|(id, (fingerprint, energy))| {
                let structure = candidate(template, id, *energy);
                store.insert(&structure, Some(Fingerprint::new(*fingerprint)), None);
                structure
            })
            .collect();
        (structures, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{candidate, template};

    #[test]
    fn attached_energies_are_collected_in_order() {
        let template = template();
        let structures = vec![candidate(&template, 0, 1.5), candidate(&template, 1, -0.5)];
        assert_eq!(attached_energies(&structures).unwrap(), vec![1.5, -0.5]);
    }

    #[test]
    fn first_missing_energy_is_reported() {
        let template = template();
        let structures = vec![
            candidate(&template, 0, 1.5),
            candidate(&template, 1, 0.0).without_energy(),
            candidate(&template, 2, 0.0).without_energy(),
        ];
        assert!(matches!(
            attached_energies(&structures),
            Err(RefineError::MissingEnergy { index: 1 })
        ));
    }
}

use super::traits::{DescriptorError, DescriptorSettings, Fingerprint, GraphDescriptor};
use crate::core::graph::bond_matrix::BondMatrix;
use crate::core::graph::indices::GraphIndexSet;
use crate::core::models::structure::Structure;
use crate::core::models::template::Template;
use crate::core::utils::elements::covalent_radius;
use itertools::Itertools;

pub const DEFAULT_CUTOFF_SCALE: f64 = 1.2;

/// Neighbour detection by scaled covalent radii.
///
/// Two graph sites are bonded when their minimum-image distance does not exceed
/// `scale * (r_i + r_j)`. The fingerprint lists, for every cluster atom, its element, the top-layer
/// sites it binds to and the elements of its cluster neighbours; the per-atom entries are sorted so
/// the fingerprint does not depend on the order of the cluster atoms.
#[derive(Debug, Clone)]
pub struct CutoffDescriptor {
    scale: f64,
    settings: DescriptorSettings,
}

impl Default for CutoffDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF_SCALE)
    }
}

impl CutoffDescriptor {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            settings: DescriptorSettings::default(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn site_radii(
        &self,
        structure: &Structure,
        template: &Template,
        indices: &GraphIndexSet,
    ) -> Result<Vec<f64>, DescriptorError> {
        let expected = template.len() + indices.num_cluster_atoms();
        if structure.len() != expected {
            return Err(DescriptorError::AtomCountMismatch {
                expected,
                found: structure.len(),
            });
        }

        indices
            .indices()
            .iter()
            .map(|&atom| {
                let symbol = &structure.atoms()[atom].symbol;
                covalent_radius(symbol).ok_or_else(|| DescriptorError::UnknownElement(symbol.clone()))
            })
            .collect()
    }
}

impl GraphDescriptor for CutoffDescriptor {
    fn name(&self) -> &'static str {
        "cutoff"
    }

    fn settings(&self) -> &DescriptorSettings {
        &self.settings
    }

    fn fingerprint(
        &self,
        structure: &Structure,
        template: &Template,
        indices: &GraphIndexSet,
    ) -> Result<Fingerprint, DescriptorError> {
        let matrix = self.bond_matrix(structure, template, indices)?;
        let symbol_of = |site: usize| structure.atoms()[indices.indices()[site]].symbol.as_str();

        let sites = indices
            .cluster_sites()
            .map(|site| {
                let bonded = (0..matrix.dim()).filter(|&other| matrix.is_bonded(site, other));
                let support = bonded
                    .clone()
                    .filter(|&other| !indices.is_cluster_site(other))
                    .join(",");
                let cluster = bonded
                    .filter(|&other| indices.is_cluster_site(other))
                    .map(symbol_of)
                    .sorted()
                    .join(",");
                format!("{}@[{}]/[{}]", symbol_of(site), support, cluster)
            })
            .sorted()
            .join(";");

        Ok(Fingerprint::new(format!(
            "{}|{}",
            self.settings.site_mapping.as_str(),
            sites
        )))
    }

    fn bond_matrix(
        &self,
        structure: &Structure,
        template: &Template,
        indices: &GraphIndexSet,
    ) -> Result<BondMatrix, DescriptorError> {
        let radii = self.site_radii(structure, template, indices)?;
        let atoms = indices.indices();

        let mut matrix = BondMatrix::zeros(atoms.len());
        for (a, b) in (0..atoms.len()).tuple_combinations() {
            let cutoff = self.scale * (radii[a] + radii[b]);
            if structure.distance(atoms[a], atoms[b]) <= cutoff {
                matrix.connect(a, b)?;
            }
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::{Point3, Vector3};

    fn template() -> Template {
        Template::fcc111("Pt", (3, 3, 2), 3.92, 12.0).unwrap()
    }

    fn top_site(template: &Template, top_atom: usize) -> Point3<f64> {
        template.structure().atoms()[top_atom].position + Vector3::new(0.0, 0.0, 2.3)
    }

    fn adsorb(template: &Template, positions: &[(&str, Point3<f64>)]) -> Structure {
        positions
            .iter()
            .fold(template.structure().clone(), |structure, (symbol, position)| {
                structure.with_atom(Atom::new(symbol, *position))
            })
    }

    #[test]
    fn top_site_adatom_binds_to_a_single_support_atom() {
        let template = template();
        let top = template.top_layer_indices();
        let structure = adsorb(&template, &[("Pt", top_site(&template, top[4]))]);
        let indices = GraphIndexSet::new(&template, structure.len()).unwrap();

        let matrix = CutoffDescriptor::default()
            .bond_matrix(&structure, &template, &indices)
            .unwrap();
        let adatom = indices.cluster_sites().start;
        let bonded: Vec<usize> = (0..matrix.dim())
            .filter(|&site| matrix.is_bonded(adatom, site))
            .collect();
        assert_eq!(bonded, vec![4]);
    }

    #[test]
    fn fingerprint_ignores_cluster_atom_order() {
        let template = template();
        let top = template.top_layer_indices();
        let a = ("O", top_site(&template, top[0]));
        let b = ("Pt", top_site(&template, top[4]));
        let forward = adsorb(&template, &[a, b]);
        let backward = adsorb(&template, &[b, a]);
        let indices = GraphIndexSet::new(&template, forward.len()).unwrap();

        let descriptor = CutoffDescriptor::default();
        assert_eq!(
            descriptor.fingerprint(&forward, &template, &indices).unwrap(),
            descriptor.fingerprint(&backward, &template, &indices).unwrap()
        );
    }

    #[test]
    fn fingerprint_distinguishes_occupied_sites() {
        let template = template();
        let top = template.top_layer_indices();
        let on_top = adsorb(&template, &[("Pt", top_site(&template, top[0]))]);
        let elsewhere = adsorb(&template, &[("Pt", top_site(&template, top[4]))]);
        let indices = GraphIndexSet::new(&template, on_top.len()).unwrap();

        let descriptor = CutoffDescriptor::default();
        let first = descriptor.fingerprint(&on_top, &template, &indices).unwrap();
        assert_ne!(
            first,
            descriptor.fingerprint(&elsewhere, &template, &indices).unwrap()
        );
        assert!(first.as_str().starts_with("fcc111|"));
    }

    #[test]
    fn fingerprint_ignores_energy() {
        let template = template();
        let top = template.top_layer_indices();
        let structure = adsorb(&template, &[("Pt", top_site(&template, top[0]))]);
        let indices = GraphIndexSet::new(&template, structure.len()).unwrap();

        let descriptor = CutoffDescriptor::default();
        assert_eq!(
            descriptor.fingerprint(&structure, &template, &indices).unwrap(),
            descriptor
                .fingerprint(&structure.clone().with_energy(3.0), &template, &indices)
                .unwrap()
        );
    }

    #[test]
    fn unknown_elements_are_reported() {
        let template = template();
        let top = template.top_layer_indices();
        let structure = adsorb(&template, &[("Xx", top_site(&template, top[0]))]);
        let indices = GraphIndexSet::new(&template, structure.len()).unwrap();

        assert!(matches!(
            CutoffDescriptor::default().bond_matrix(&structure, &template, &indices),
            Err(DescriptorError::UnknownElement(symbol)) if symbol == "Xx"
        ));
    }

    #[test]
    fn structures_not_matching_the_index_set_are_rejected() {
        let template = template();
        let top = template.top_layer_indices();
        let structure = adsorb(&template, &[("Pt", top_site(&template, top[0]))]);
        let indices = GraphIndexSet::new(&template, structure.len() + 1).unwrap();

        assert!(matches!(
            CutoffDescriptor::default().bond_matrix(&structure, &template, &indices),
            Err(DescriptorError::AtomCountMismatch {
                expected: 20,
                found: 19
            })
        ));
    }
}

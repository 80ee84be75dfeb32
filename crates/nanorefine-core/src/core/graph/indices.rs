use super::GraphError;
use crate::core::models::template::Template;
use std::ops::Range;

/// The atom indices that make up the graph of a supported structure.
///
/// Graph site `k` corresponds to atom `indices()[k]`. The first `num_top_layer_atoms()` sites are
/// the template's top-layer atoms in ascending order; the remaining sites are the cluster atoms,
/// i.e. every atom from `template.len()` up to the structure's atom count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphIndexSet {
    indices: Vec<usize>,
    num_top_layer_atoms: usize,
}

impl GraphIndexSet {
    /// Derives the index set for structures of `n_atoms` atoms built on `template`.
    pub fn new(template: &Template, n_atoms: usize) -> Result<Self, GraphError> {
        if n_atoms < template.len() {
            return Err(GraphError::AtomCountBelowTemplate {
                atoms: n_atoms,
                template: template.len(),
            });
        }

        let mut indices = template.top_layer_indices();
        let num_top_layer_atoms = indices.len();
        indices.extend(template.len()..n_atoms);

        Ok(Self {
            indices,
            num_top_layer_atoms,
        })
    }

    /// Atom indices in graph-site order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of graph sites.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn num_top_layer_atoms(&self) -> usize {
        self.num_top_layer_atoms
    }

    pub fn num_cluster_atoms(&self) -> usize {
        self.indices.len() - self.num_top_layer_atoms
    }

    /// Graph sites occupied by cluster atoms.
    pub fn cluster_sites(&self) -> Range<usize> {
        self.num_top_layer_atoms..self.indices.len()
    }

    /// Graph sites occupied by top-layer support atoms.
    pub fn support_sites(&self) -> Range<usize> {
        0..self.num_top_layer_atoms
    }

    /// Whether graph site `site` is a cluster atom.
    pub fn is_cluster_site(&self, site: usize) -> bool {
        self.cluster_sites().contains(&site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::Structure;
    use nalgebra::{Matrix3, Point3};

    fn two_layer_template() -> Template {
        // Tags deliberately interleaved to check that top-layer order follows atom order.
        let atoms = vec![
            Atom::new("Pt", Point3::new(0.0, 0.0, 0.0)).with_tag(2),
            Atom::new("Pt", Point3::new(0.0, 0.0, 2.0)).with_tag(1),
            Atom::new("Pt", Point3::new(2.0, 0.0, 0.0)).with_tag(2),
            Atom::new("Pt", Point3::new(2.0, 0.0, 2.0)).with_tag(1),
        ];
        Template::new(Structure::new(atoms, Matrix3::identity() * 4.0, [true; 3]))
    }

    #[test]
    fn index_set_lists_top_layer_then_cluster_atoms() {
        let indices = GraphIndexSet::new(&two_layer_template(), 7).unwrap();

        assert_eq!(indices.indices(), &[1, 3, 4, 5, 6]);
        assert_eq!(indices.num_top_layer_atoms(), 2);
        assert_eq!(indices.num_cluster_atoms(), 3);
        assert_eq!(indices.cluster_sites(), 2..5);
        assert_eq!(indices.support_sites(), 0..2);
        assert!(indices.is_cluster_site(2));
        assert!(!indices.is_cluster_site(1));
        assert!(!indices.is_cluster_site(5));
    }

    #[test]
    fn index_set_without_cluster_has_only_support_sites() {
        let indices = GraphIndexSet::new(&two_layer_template(), 4).unwrap();
        assert_eq!(indices.len(), 2);
        assert_eq!(indices.num_cluster_atoms(), 0);
        assert!(indices.cluster_sites().is_empty());
    }

    #[test]
    fn index_set_rejects_structures_smaller_than_template() {
        assert_eq!(
            GraphIndexSet::new(&two_layer_template(), 3),
            Err(GraphError::AtomCountBelowTemplate {
                atoms: 3,
                template: 4
            })
        );
    }
}

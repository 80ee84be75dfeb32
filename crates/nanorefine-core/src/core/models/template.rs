use super::atom::Atom;
use super::constraint::Constraint;
use super::structure::Structure;
use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;

/// Height of the box cluster atoms are confined to during surrogate relaxation, in Angstroms.
const CONFINEMENT_HEIGHT: f64 = 7.0;
/// Distance the confinement box reaches below the highest support atom, in Angstroms.
const CONFINEMENT_DEPTH: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("Slab size must be positive in every direction, got {0:?}")]
    InvalidSize((usize, usize, usize)),
    #[error("Lattice parameter must be positive and finite, got {0}")]
    InvalidLatticeParameter(f64),
    #[error("Vacuum must be non-negative and finite, got {0}")]
    InvalidVacuum(f64),
    #[error("Template has no top-layer atoms (tag 1)")]
    NoTopLayer,
    #[error("Structure has {structure} atoms but the template has {template}")]
    StructureSmallerThanTemplate { structure: usize, template: usize },
}

/// The clean support onto which cluster atoms are adsorbed.
///
/// The first `len()` atoms of every structure built on a template are the support; every atom
/// beyond that index belongs to the cluster. Support atoms tagged `1` form the top layer, the only
/// support atoms taking part in graph descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    structure: Structure,
}

impl Template {
    pub fn new(structure: Structure) -> Self {
        Self { structure }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn into_structure(self) -> Structure {
        self.structure
    }

    /// Number of support atoms.
    pub fn len(&self) -> usize {
        self.structure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    /// Indices of support atoms in the top layer (tag `1`), ascending.
    pub fn top_layer_indices(&self) -> Vec<usize> {
        self.structure
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.is_top_layer())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn num_top_layer_atoms(&self) -> usize {
        self.structure
            .atoms()
            .iter()
            .filter(|atom| atom.is_top_layer())
            .count()
    }

    /// Number of cluster atoms in `structure`, i.e. atoms beyond the support.
    pub fn cluster_len(&self, structure: &Structure) -> Result<usize, TemplateError> {
        structure
            .len()
            .checked_sub(self.len())
            .ok_or(TemplateError::StructureSmallerThanTemplate {
                structure: structure.len(),
                template: self.len(),
            })
    }

    /// Mean height of the top layer.
    pub fn top_layer_height(&self) -> Result<f64, TemplateError> {
        let heights: Vec<f64> = self
            .structure
            .atoms()
            .iter()
            .filter(|atom| atom.is_top_layer())
            .map(|atom| atom.position.z)
            .collect();
        if heights.is_empty() {
            return Err(TemplateError::NoTopLayer);
        }
        Ok(heights.iter().sum::<f64>() / heights.len() as f64)
    }

    /// Builds a non-orthogonal fcc(111) slab.
    ///
    /// Layers are stacked ABC along z with spacing `a / sqrt(3)`; the in-plane cell is spanned by
    /// `nx` and `ny` nearest-neighbour vectors at 60 degrees. Atoms are ordered bottom layer first
    /// and tagged by layer counted from the top, so the exposed layer carries tag `1`.
    ///
    /// `vacuum` is the total gap between the top layer and the bottom layer of the next periodic
    /// image. The slab is placed low in the cell, a quarter of the vacuum above the cell origin,
    /// leaving headroom above the surface for cluster atoms.
    ///
    /// # Arguments
    ///
    /// * `element` - Element symbol of the support.
    /// * `size` - Atoms along the two in-plane vectors and number of layers.
    /// * `a` - Cubic lattice parameter in Angstroms.
    /// * `vacuum` - Total vacuum size in Angstroms.
    pub fn fcc111(
        element: &str,
        size: (usize, usize, usize),
        a: f64,
        vacuum: f64,
    ) -> Result<Self, TemplateError> {
        let (nx, ny, layers) = size;
        if nx == 0 || ny == 0 || layers == 0 {
            return Err(TemplateError::InvalidSize(size));
        }
        if !(a.is_finite() && a > 0.0) {
            return Err(TemplateError::InvalidLatticeParameter(a));
        }
        if !(vacuum.is_finite() && vacuum >= 0.0) {
            return Err(TemplateError::InvalidVacuum(vacuum));
        }

        let spacing = a / 2.0_f64.sqrt();
        let layer_distance = a / 3.0_f64.sqrt();
        let half_sqrt3 = 3.0_f64.sqrt() / 2.0;
        let bottom = vacuum / 4.0;

        let mut atoms = Vec::with_capacity(nx * ny * layers);
        for layer in 0..layers {
            // Counting down from the top layer, which sits at offset 0.
            let from_top = layers - 1 - layer;
            let offset = (from_top % 3) as f64 / 3.0;
            let z = bottom + layer as f64 * layer_distance;
            for iy in 0..ny {
                for ix in 0..nx {
                    let fx = ix as f64 + offset;
                    let fy = iy as f64 + offset;
                    let position =
                        Point3::new((fx + 0.5 * fy) * spacing, fy * half_sqrt3 * spacing, z);
                    atoms.push(Atom::new(element, position).with_tag((from_top + 1) as i32));
                }
            }
        }

        let cell = Matrix3::new(
            nx as f64 * spacing,
            0.0,
            0.0,
            0.5 * ny as f64 * spacing,
            half_sqrt3 * ny as f64 * spacing,
            0.0,
            0.0,
            0.0,
            (layers - 1) as f64 * layer_distance + vacuum,
        );

        Ok(Self::new(Structure::new(atoms, cell, [true, true, true])))
    }

    /// Moves the cluster of `structure`, built on this template, onto `target`.
    ///
    /// The cluster is shifted vertically by the difference in mean top-layer height so its
    /// distance to the surface is preserved. The result carries the target's cell and periodicity
    /// and no calculator result.
    pub fn transfer(&self, structure: &Structure, target: &Template) -> Result<Structure, TemplateError> {
        self.cluster_len(structure)?;
        let shift = target.top_layer_height()? - self.top_layer_height()?;

        let cluster = structure.atoms()[self.len()..].iter().map(|atom| {
            let mut moved = atom.clone();
            moved.position.z += shift;
            moved
        });

        let atoms = target
            .structure
            .atoms()
            .iter()
            .cloned()
            .chain(cluster)
            .collect();

        Ok(Structure::new(atoms, *target.structure.cell(), target.structure.pbc()))
    }

    /// Constraints applied to a structure of `n_atoms` atoms while it is relaxed on a surrogate.
    ///
    /// All support atoms are fixed. Cluster atoms are confined to a box spanning the in-plane cell,
    /// periodic in-plane, starting slightly below the highest support atom.
    pub fn relaxation_constraints(&self, n_atoms: usize) -> Vec<Constraint> {
        let mut confinement = *self.structure.cell();
        for row in 0..3 {
            confinement[(row, 2)] = 0.0;
        }
        confinement[(2, 2)] = CONFINEMENT_HEIGHT;

        let top = self
            .structure
            .atoms()
            .iter()
            .map(|atom| atom.position.z)
            .fold(f64::NEG_INFINITY, f64::max);
        let corner = Vector3::new(0.0, 0.0, top - CONFINEMENT_DEPTH);

        vec![
            Constraint::FixAtoms {
                indices: (0..self.len()).collect(),
            },
            Constraint::Confinement {
                cell: confinement,
                corner,
                indices: (self.len()..n_atoms).collect(),
                pbc: [true, true, false],
            },
        ]
    }
}

use super::atom::Atom;
use super::constraint::Constraint;
use nalgebra::{Matrix3, Vector3};

/// A periodic atomic structure with an optional attached potential energy.
///
/// Structures are value-like. The energy is attached by a calculator and is never edited in
/// place: [`Structure::with_energy`] consumes the structure and returns a new value carrying the
/// new result, so a downstream stage cannot silently overwrite an upstream evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// Atoms in their canonical order. Support atoms precede cluster atoms.
    atoms: Vec<Atom>,
    /// Lattice vectors as rows, in Angstroms.
    cell: Matrix3<f64>,
    /// Periodic-boundary flags per lattice vector.
    pbc: [bool; 3],
    /// Constraints attached for the current relaxation, if any.
    constraints: Vec<Constraint>,
    /// Potential energy from the attached calculator result.
    energy: Option<f64>,
}

impl Structure {
    /// Creates a structure without constraints or an attached energy.
    ///
    /// # Arguments
    ///
    /// * `atoms` - The atoms in canonical order.
    /// * `cell` - The lattice vectors as matrix rows.
    /// * `pbc` - Periodic-boundary flags for the three lattice vectors.
    pub fn new(atoms: Vec<Atom>, cell: Matrix3<f64>, pbc: [bool; 3]) -> Self {
        Self {
            atoms,
            cell,
            pbc,
            constraints: Vec::new(),
            energy: None,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn cell(&self) -> &Matrix3<f64> {
        &self.cell
    }

    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The attached potential energy, if a calculator result is present.
    pub fn energy(&self) -> Option<f64> {
        self.energy
    }

    /// Returns the structure with a new calculator result attached.
    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    /// Returns the structure with its calculator result removed.
    ///
    /// Any edit to the geometry invalidates the previous evaluation, so every geometry-changing
    /// builder in this crate produces an energy-free structure.
    pub fn without_energy(mut self) -> Self {
        self.energy = None;
        self
    }

    /// Returns the structure with the given constraints attached.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Returns the structure with all constraints cleared.
    pub fn without_constraints(mut self) -> Self {
        self.constraints.clear();
        self
    }

    /// Returns the structure with one atom appended.
    pub fn with_atom(mut self, atom: Atom) -> Self {
        self.atoms.push(atom);
        self.energy = None;
        self
    }

    /// Returns the structure with every atom from `start` onwards translated by `shift`.
    pub fn translated_from(mut self, start: usize, shift: Vector3<f64>) -> Self {
        for atom in self.atoms.iter_mut().skip(start) {
            atom.position += shift;
        }
        self.energy = None;
        self
    }

    /// The shortest distance between atoms `i` and `j` over all periodic images.
    ///
    /// Falls back to the plain Cartesian distance when no axis is periodic or the cell is singular.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        let delta = self.atoms[j].position - self.atoms[i].position;
        if !self.pbc.iter().any(|&periodic| periodic) {
            return delta.norm();
        }

        let cell_t = self.cell.transpose();
        let Some(inverse) = cell_t.try_inverse() else {
            return delta.norm();
        };

        let mut fractional = inverse * delta;
        for axis in 0..3 {
            if self.pbc[axis] {
                fractional[axis] -= fractional[axis].round();
            }
        }

        let image_range = |axis: usize| if self.pbc[axis] { -1..=1 } else { 0..=0 };
        let mut best = f64::INFINITY;
        for a in image_range(0) {
            for b in image_range(1) {
                for c in image_range(2) {
                    let shifted = fractional + Vector3::new(a as f64, b as f64, c as f64);
                    best = best.min((cell_t * shifted).norm());
                }
            }
        }
        best
    }

    /// A hashable identity of the structure's geometry: symbols, positions and cell.
    ///
    /// Two structures with identical coordinates, elements and cell share a key regardless of
    /// their attached energies or constraints.
    pub fn geometry_key(&self) -> GeometryKey {
        let normalize = |value: f64| if value == 0.0 { 0.0_f64 } else { value };
        let mut bits = Vec::with_capacity(self.atoms.len() * 3 + 9);
        for atom in &self.atoms {
            bits.extend(atom.position.coords.iter().map(|&v| normalize(v).to_bits()));
        }
        bits.extend(self.cell.iter().map(|&v| normalize(v).to_bits()));

        GeometryKey {
            symbols: self.atoms.iter().map(|a| a.symbol.clone()).collect(),
            bits,
        }
    }
}

/// Exact geometric identity of a structure, see [`Structure::geometry_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeometryKey {
    symbols: Vec<String>,
    bits: Vec<u64>,
}

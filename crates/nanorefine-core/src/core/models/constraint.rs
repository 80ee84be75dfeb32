use nalgebra::{Matrix3, Vector3};

/// A geometric constraint attached to a structure for the duration of a relaxation.
///
/// Constraints are carried as data only; the relaxation engine that honours them is external.
/// The quality gate clears them when it substitutes a pre-relaxation geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Atoms whose positions must not move.
    FixAtoms { indices: Vec<usize> },
    /// Atoms confined to the parallelepiped spanned by `cell` (rows are edge vectors) starting
    /// at `corner`. Axes flagged in `pbc` wrap instead of confining.
    Confinement {
        cell: Matrix3<f64>,
        corner: Vector3<f64>,
        indices: Vec<usize>,
        pbc: [bool; 3],
    },
}

impl Constraint {
    /// Whether the constraint restricts the atom at `index`.
    pub fn applies_to(&self, index: usize) -> bool {
        match self {
            Constraint::FixAtoms { indices } | Constraint::Confinement { indices, .. } => {
                indices.contains(&index)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_to_checks_listed_indices() {
        let fix = Constraint::FixAtoms {
            indices: vec![0, 1, 2],
        };
        assert!(fix.applies_to(1));
        assert!(!fix.applies_to(3));

        let confine = Constraint::Confinement {
            cell: Matrix3::identity(),
            corner: Vector3::zeros(),
            indices: vec![3, 4],
            pbc: [true, true, false],
        };
        assert!(confine.applies_to(4));
        assert!(!confine.applies_to(0));
    }
}

use nalgebra::Point3;

/// A single atom of a structure.
///
/// Atoms are identified by their position in the owning [`Structure`](super::structure::Structure);
/// there are no separate handles. The tag follows the surface-slab convention: layers of a support
/// are numbered from the top, so tag `1` marks the exposed top layer and cluster atoms carry tag `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The chemical element symbol (e.g., "Pt", "O").
    pub symbol: String,
    /// The Cartesian position in Angstroms.
    pub position: Point3<f64>,
    /// The integer tag (layer number for support atoms, `0` otherwise).
    pub tag: i32,
}

impl Atom {
    /// Creates an untagged atom.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The element symbol.
    /// * `position` - The Cartesian position in Angstroms.
    pub fn new(symbol: &str, position: Point3<f64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            position,
            tag: 0,
        }
    }

    /// Returns the atom with its tag replaced.
    pub fn with_tag(mut self, tag: i32) -> Self {
        self.tag = tag;
        self
    }

    /// Whether the atom belongs to the exposed top layer of a support.
    pub fn is_top_layer(&self) -> bool {
        self.tag == 1
    }
}

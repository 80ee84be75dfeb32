use super::BatchError;
use crate::core::descriptors::precomputed::PrecomputedDescriptors;
use crate::core::descriptors::traits::Fingerprint;
use crate::core::graph::GraphError;
use crate::core::graph::bond_matrix::BondMatrix;
use crate::core::models::atom::Atom;
use crate::core::models::constraint::Constraint;
use crate::core::models::structure::Structure;
use crate::core::models::template::Template;
use nalgebra::{Matrix3, Point3, Vector3};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub symbol: String,
    pub position: [f64; 3],
    #[serde(default)]
    pub tag: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ConstraintRecord {
    FixAtoms {
        indices: Vec<usize>,
    },
    Confinement {
        cell: [[f64; 3]; 3],
        corner: [f64; 3],
        indices: Vec<usize>,
        pbc: [bool; 3],
    },
}

fn default_pbc() -> [bool; 3] {
    [true; 3]
}

/// A structure as stored on disk, with the descriptor values an external service attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRecord {
    pub atoms: Vec<AtomRecord>,
    /// Lattice vectors as rows.
    pub cell: [[f64; 3]; 3],
    #[serde(default = "default_pbc")]
    pub pbc: [bool; 3],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bond_matrix: Option<Vec<Vec<u8>>>,
}

fn rows(matrix: &Matrix3<f64>) -> [[f64; 3]; 3] {
    std::array::from_fn(|i| std::array::from_fn(|j| matrix[(i, j)]))
}

fn from_rows(rows: &[[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::from_fn(|i, j| rows[i][j])
}

impl From<&Constraint> for ConstraintRecord {
    fn from(constraint: &Constraint) -> Self {
        match constraint {
            Constraint::FixAtoms { indices } => ConstraintRecord::FixAtoms {
                indices: indices.clone(),
            },
            Constraint::Confinement {
                cell,
                corner,
                indices,
                pbc,
            } => ConstraintRecord::Confinement {
                cell: rows(cell),
                corner: [corner.x, corner.y, corner.z],
                indices: indices.clone(),
                pbc: *pbc,
            },
        }
    }
}

impl From<ConstraintRecord> for Constraint {
    fn from(record: ConstraintRecord) -> Self {
        match record {
            ConstraintRecord::FixAtoms { indices } => Constraint::FixAtoms { indices },
            ConstraintRecord::Confinement {
                cell,
                corner,
                indices,
                pbc,
            } => Constraint::Confinement {
                cell: from_rows(&cell),
                corner: Vector3::from(corner),
                indices,
                pbc,
            },
        }
    }
}

impl StructureRecord {
    pub fn from_structure(structure: &Structure) -> Self {
        Self {
            atoms: structure
                .atoms()
                .iter()
                .map(|atom| AtomRecord {
                    symbol: atom.symbol.clone(),
                    position: [atom.position.x, atom.position.y, atom.position.z],
                    tag: atom.tag,
                })
                .collect(),
            cell: rows(structure.cell()),
            pbc: structure.pbc(),
            constraints: structure.constraints().iter().map(Into::into).collect(),
            energy: structure.energy(),
            fingerprint: None,
            bond_matrix: None,
        }
    }

    /// The structure described by this record, without its descriptor values.
    pub fn to_structure(&self) -> Structure {
        let atoms = self
            .atoms
            .iter()
            .map(|record| {
                Atom::new(&record.symbol, Point3::from(record.position)).with_tag(record.tag)
            })
            .collect();
        let structure = Structure::new(atoms, from_rows(&self.cell), self.pbc)
            .with_constraints(self.constraints.iter().cloned().map(Into::into).collect());
        match self.energy {
            Some(energy) => structure.with_energy(energy),
            None => structure,
        }
    }

    pub fn bond_matrix(&self) -> Result<Option<BondMatrix>, GraphError> {
        self.bond_matrix
            .as_deref()
            .map(BondMatrix::from_rows)
            .transpose()
    }
}

/// The pieces of a [`StructureBatch`] in their in-memory form.
#[derive(Debug, Clone)]
pub struct BatchParts {
    pub template: Template,
    pub structures: Vec<Structure>,
    pub descriptors: PrecomputedDescriptors,
}

/// A template and the candidate structures built on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureBatch {
    pub template: StructureRecord,
    pub structures: Vec<StructureRecord>,
}

impl StructureBatch {
    /// Builds a batch, copying any descriptor values `descriptors` holds for the structures.
    pub fn from_parts(
        template: &Template,
        structures: &[Structure],
        descriptors: Option<&PrecomputedDescriptors>,
    ) -> Self {
        let structures = structures
            .iter()
            .map(|structure| {
                let mut record = StructureRecord::from_structure(structure);
                if let Some(store) = descriptors {
                    record.fingerprint = store.fingerprint_of(structure).cloned();
                    record.bond_matrix = store.bond_matrix_of(structure).map(BondMatrix::to_rows);
                }
                record
            })
            .collect();
        Self {
            template: StructureRecord::from_structure(template.structure()),
            structures,
        }
    }

    pub fn into_parts(self) -> Result<BatchParts, BatchError> {
        let template = Template::new(self.template.to_structure());
        let mut descriptors = PrecomputedDescriptors::new();
        let mut structures = Vec::with_capacity(self.structures.len());

        for (index, record) in self.structures.into_iter().enumerate() {
            let structure = record.to_structure();
            let bond_matrix = record
                .bond_matrix()
                .map_err(|source| BatchError::BondMatrix { index, source })?;
            if record.fingerprint.is_some() || bond_matrix.is_some() {
                descriptors.insert(&structure, record.fingerprint, bond_matrix);
            }
            structures.push(structure);
        }

        Ok(BatchParts {
            template,
            structures,
            descriptors,
        })
    }
}

/// The inputs and results of one external surrogate relaxation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Pre-relaxation geometry; its energy is the ground-truth result.
    pub unrelaxed: StructureRecord,
    pub relaxed: StructureRecord,
    /// Surrogate energy of the unrelaxed geometry.
    pub predicted_initial: f64,
    /// Surrogate energy of the relaxed geometry.
    pub predicted_final: f64,
    /// Ground-truth energy, when it is not attached to `unrelaxed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_energy: Option<f64>,
}

/// Relaxation outcomes of a batch, with the template they were built on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeBatch {
    pub template: StructureRecord,
    pub outcomes: Vec<OutcomeRecord>,
}

fn path_label(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// JSON reading and writing shared by the batch file types.
pub trait JsonFile: Serialize + DeserializeOwned {
    fn read_from(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(BufReader::new(reader))
    }

    fn write_to(&self, writer: impl Write) -> Result<(), serde_json::Error> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(serde_json::Error::io)
    }

    fn read_from_path(path: &Path) -> Result<Self, BatchError> {
        let file = File::open(path).map_err(|source| BatchError::Io {
            path: path_label(path),
            source,
        })?;
        Self::read_from(file).map_err(|source| BatchError::Json {
            path: path_label(path),
            source,
        })
    }

    fn write_to_path(&self, path: &Path) -> Result<(), BatchError> {
        let file = File::create(path).map_err(|source| BatchError::Io {
            path: path_label(path),
            source,
        })?;
        self.write_to(file).map_err(|source| BatchError::Json {
            path: path_label(path),
            source,
        })
    }
}

impl JsonFile for StructureBatch {}
impl JsonFile for OutcomeBatch {}

use super::GraphError;
use super::traversal::Adjacency;
use nalgebra::DMatrix;

/// Binary adjacency between graph sites.
///
/// `M[i, j] == 1` marks sites `i` and `j` as neighbours; any other value means no edge. Diagonal
/// entries carry no information and are ignored when building an [`Adjacency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondMatrix {
    matrix: DMatrix<u8>,
}

impl BondMatrix {
    /// An edge-free matrix over `dim` sites.
    pub fn zeros(dim: usize) -> Self {
        Self {
            matrix: DMatrix::zeros(dim, dim),
        }
    }

    pub fn from_matrix(matrix: DMatrix<u8>) -> Result<Self, GraphError> {
        if !matrix.is_square() {
            return Err(GraphError::NotSquare {
                rows: matrix.nrows(),
                columns: matrix.ncols(),
            });
        }
        Ok(Self { matrix })
    }

    /// Builds a matrix from row vectors, as found in serialized descriptor output.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GraphError> {
        let dim = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != dim) {
            return Err(GraphError::NotSquare {
                rows: dim,
                columns: row.len(),
            });
        }
        Ok(Self {
            matrix: DMatrix::from_fn(dim, dim, |i, j| rows[i][j]),
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.matrix
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Number of graph sites.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Marks sites `i` and `j` as neighbours in both directions.
    pub fn connect(&mut self, i: usize, j: usize) -> Result<(), GraphError> {
        let len = self.dim();
        for index in [i, j] {
            if index >= len {
                return Err(GraphError::SiteOutOfRange { index, len });
            }
        }
        self.matrix[(i, j)] = 1;
        self.matrix[(j, i)] = 1;
        Ok(())
    }

    /// Whether `i` lists `j` as a neighbour. Self-loops never count.
    pub fn is_bonded(&self, i: usize, j: usize) -> bool {
        i != j && self.matrix[(i, j)] == 1
    }

    /// Ensures the matrix covers exactly `expected` graph sites.
    pub fn check_dim(&self, expected: usize) -> Result<(), GraphError> {
        if self.dim() != expected {
            return Err(GraphError::DimensionMismatch {
                expected,
                found: self.dim(),
            });
        }
        Ok(())
    }

    /// The neighbour lists encoded by the matrix, row by row.
    pub fn adjacency(&self) -> Adjacency {
        let dim = self.dim();
        let mut adjacency = Adjacency::new(dim);
        for i in 0..dim {
            for j in 0..dim {
                if self.is_bonded(i, j) {
                    adjacency.add_arc(i, j);
                }
            }
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows = vec![vec![0, 1], vec![1]];
        assert_eq!(
            BondMatrix::from_rows(&rows),
            Err(GraphError::NotSquare {
                rows: 2,
                columns: 1
            })
        );
    }

    #[test]
    fn from_matrix_rejects_non_square_input() {
        let matrix = DMatrix::<u8>::zeros(2, 3);
        assert!(matches!(
            BondMatrix::from_matrix(matrix),
            Err(GraphError::NotSquare { .. })
        ));
    }

    #[test]
    fn rows_survive_conversion_both_ways() {
        let rows = vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]];
        let matrix = BondMatrix::from_rows(&rows).unwrap();
        assert_eq!(matrix.dim(), 3);
        assert_eq!(matrix.to_rows(), rows);
    }

    #[test]
    fn self_loops_are_not_bonds() {
        let rows = vec![vec![1, 1], vec![1, 1]];
        let matrix = BondMatrix::from_rows(&rows).unwrap();
        assert!(!matrix.is_bonded(0, 0));
        assert!(matrix.is_bonded(0, 1));

        let adjacency = matrix.adjacency();
        assert_eq!(adjacency.neighbors(0), &[1]);
        assert_eq!(adjacency.neighbors(1), &[0]);
    }

    #[test]
    fn only_ones_mark_edges() {
        let rows = vec![vec![0, 2], vec![2, 0]];
        let matrix = BondMatrix::from_rows(&rows).unwrap();
        assert!(!matrix.is_bonded(0, 1));
    }

    #[test]
    fn connect_is_symmetric_and_bounds_checked() {
        let mut matrix = BondMatrix::zeros(3);
        matrix.connect(0, 2).unwrap();
        assert!(matrix.is_bonded(0, 2));
        assert!(matrix.is_bonded(2, 0));
        assert_eq!(
            matrix.connect(0, 3),
            Err(GraphError::SiteOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn check_dim_reports_mismatch() {
        let matrix = BondMatrix::zeros(4);
        assert!(matrix.check_dim(4).is_ok());
        assert_eq!(
            matrix.check_dim(5),
            Err(GraphError::DimensionMismatch {
                expected: 5,
                found: 4
            })
        );
    }
}

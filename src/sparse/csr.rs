use crate::sparse::CooMatrix;

/// Compressed sparse row matrix.
///
/// Row `i` occupies `indices[indptr[i]..indptr[i + 1]]` and the same range of `values`,
/// column indices are strictly increasing within a row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl From<&CooMatrix> for CsrMatrix {
    fn from(coo: &CooMatrix) -> Self {
        let (n_rows, n_cols) = coo.shape();

        let mut indptr = vec![0; n_rows + 1];
        for (row, _, _) in coo.triplets() {
            indptr[row + 1] += 1;
        }
        for i in 0..n_rows {
            indptr[i + 1] += indptr[i];
        }

        // Scatter the triplets into their rows, keeping the original order within a row.
        let mut next = indptr.clone();
        let mut unsorted = vec![(0, 0.0); coo.nnz()];
        for (row, col, value) in coo.triplets() {
            unsorted[next[row]] = (col, value);
            next[row] += 1;
        }

        let mut matrix = Self {
            n_cols,
            indptr: Vec::with_capacity(n_rows + 1),
            indices: Vec::with_capacity(coo.nnz()),
            values: Vec::with_capacity(coo.nnz()),
        };
        matrix.indptr.push(0);
        for i in 0..n_rows {
            let row = &mut unsorted[indptr[i]..indptr[i + 1]];
            row.sort_by_key(|(col, _)| *col);
            let start = matrix.indices.len();
            for &(col, value) in row.iter() {
                let is_duplicate =
                    matrix.indices.len() > start && matrix.indices.last() == Some(&col);
                match matrix.values.last_mut() {
                    Some(last) if is_duplicate => *last += value,
                    _ => {
                        matrix.indices.push(col);
                        matrix.values.push(value);
                    }
                }
            }
            matrix.indptr.push(matrix.indices.len());
        }
        matrix
    }
}

impl CsrMatrix {
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Share of the non-zero cells.
    #[must_use]
    pub fn density(&self) -> f64 {
        let n_cells = self.n_rows() * self.n_cols;
        if n_cells != 0 {
            self.nnz() as f64 / n_cells as f64
        } else {
            0.0
        }
    }

    /// Column indices and values of the row.
    #[must_use]
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        let range = self.indptr[i]..self.indptr[i + 1];
        (&self.indices[range.clone()], &self.values[range])
    }

    /// Dot product of the row with a dense vector of length `n_cols`.
    #[must_use]
    #[inline]
    pub fn dot_row(&self, i: usize, dense: &[f64]) -> f64 {
        let (indices, values) = self.row(i);
        indices
            .iter()
            .zip(values)
            .fold(0.0, |dot, (j, value)| dot + value * dense[*j])
    }

    /// Computes `X · w`.
    #[must_use]
    pub fn mul_vec(&self, dense: &[f64]) -> Vec<f64> {
        debug_assert_eq!(dense.len(), self.n_cols);
        (0..self.n_rows()).map(|i| self.dot_row(i, dense)).collect()
    }

    /// Computes `Xᵀ · r` for a vector `r` of length `n_rows`.
    #[must_use]
    pub fn transpose_mul_vec(&self, dense: &[f64]) -> Vec<f64> {
        debug_assert_eq!(dense.len(), self.n_rows());
        let mut result = vec![0.0; self.n_cols];
        for (i, scale) in dense.iter().enumerate() {
            let (indices, values) = self.row(i);
            for (j, value) in indices.iter().zip(values) {
                result[*j] += scale * value;
            }
        }
        result
    }

    /// Copies the selected rows into a new matrix, in the given order.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut matrix = Self {
            n_cols: self.n_cols,
            indptr: Vec::with_capacity(rows.len() + 1),
            indices: Vec::new(),
            values: Vec::new(),
        };
        matrix.indptr.push(0);
        for i in rows {
            let (indices, values) = self.row(*i);
            matrix.indices.extend_from_slice(indices);
            matrix.values.extend_from_slice(values);
            matrix.indptr.push(matrix.indices.len());
        }
        matrix
    }

    #[cfg(test)]
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        (0..self.n_rows())
            .map(|i| {
                let mut row = vec![0.0; self.n_cols];
                let (indices, values) = self.row(i);
                for (j, value) in indices.iter().zip(values) {
                    row[*j] = *value;
                }
                row
            })
            .collect()
    }
}

use crate::prelude::*;

/// Coordinate-format matrix: a list of `(row, column, value)` triplets.
///
/// Zeros are never stored, everything not listed is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl CooMatrix {
    /// Sparsifies the dense rows, keeping each non-zero value at its position.
    pub fn from_dense(dense: &[Vec<f64>], n_cols: usize) -> Result<Self> {
        let mut matrix = Self {
            n_rows: dense.len(),
            n_cols,
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
        };
        for (i, row) in dense.iter().enumerate() {
            ensure!(
                row.len() == n_cols,
                "row #{} has {} values, expected {}",
                i,
                row.len(),
                n_cols,
            );
            for (j, value) in row.iter().enumerate() {
                if *value != 0.0 {
                    matrix.push_unchecked(i, j, *value);
                }
            }
        }
        Ok(matrix)
    }

    /// Builds the matrix from the parallel triplet arrays, as stored by `scipy.sparse.coo_matrix`.
    pub fn from_triplets(
        shape: (usize, usize),
        rows: Vec<usize>,
        cols: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let (n_rows, n_cols) = shape;
        ensure!(
            rows.len() == cols.len() && cols.len() == values.len(),
            "triplet arrays differ in length: {} rows, {} columns, {} values",
            rows.len(),
            cols.len(),
            values.len(),
        );
        if let Some((row, col)) = rows
            .iter()
            .zip(&cols)
            .find(|(row, col)| **row >= n_rows || **col >= n_cols)
        {
            bail!("entry ({}, {}) is out of the {}x{} shape", row, col, n_rows, n_cols);
        }

        let mut matrix = Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(values.len()),
            cols: Vec::with_capacity(values.len()),
            values: Vec::with_capacity(values.len()),
        };
        for ((row, col), value) in rows.into_iter().zip(cols).zip(values) {
            if value != 0.0 {
                matrix.push_unchecked(row, col, value);
            }
        }
        Ok(matrix)
    }

    fn push_unchecked(&mut self, row: usize, col: usize, value: f64) {
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((row, col), value)| (*row, *col, *value))
    }

    /// Densifies the matrix. Duplicate coordinates are summed up.
    #[cfg(test)]
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let mut dense = vec![vec![0.0; self.n_cols]; self.n_rows];
        for (row, col, value) in self.triplets() {
            dense[row][col] += value;
        }
        dense
    }
}

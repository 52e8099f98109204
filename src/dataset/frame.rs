use std::fmt::Debug;
use std::path::Path;

use serde::Deserialize;

use crate::dataset::read_pickle;
use crate::prelude::*;
use crate::sparse::CooMatrix;

/// Feature table: one row per report, one column per vocabulary term or category indicator.
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub matrix: CooMatrix,
}

impl FeatureFrame {
    #[instrument(level = "debug", skip_all, fields(path = ?path))]
    pub fn load(path: impl AsRef<Path> + Debug) -> Result<Self> {
        let raw: RawFeatures = read_pickle(path.as_ref())?;
        let frame = Self::from_raw(raw)
            .with_context(|| format!("invalid feature table in `{}`", path.as_ref().display()))?;
        debug!(
            n_rows = frame.n_rows(),
            n_cols = frame.n_cols(),
            nnz = frame.matrix.nnz(),
            "sparsified",
        );
        Ok(frame)
    }

    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.matrix.shape().0
    }

    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.matrix.shape().1
    }

    fn from_raw(raw: RawFeatures) -> Result<Self> {
        let frame = match raw {
            RawFeatures::Coordinate {
                columns,
                shape,
                row,
                col,
                data,
            } => {
                ensure!(
                    columns.len() == shape.1,
                    "{} column names for {} columns",
                    columns.len(),
                    shape.1,
                );
                Self {
                    matrix: CooMatrix::from_triplets(shape, row, col, data)?,
                    columns,
                }
            }
            RawFeatures::Split { columns, data } => {
                let data = data
                    .into_iter()
                    .map(|row| row.into_iter().map(f64::from).collect_vec())
                    .collect_vec();
                Self {
                    matrix: CooMatrix::from_dense(&data, columns.len())?,
                    columns,
                }
            }
        };
        Ok(frame)
    }
}

/// Pickled feature table layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFeatures {
    /// `scipy.sparse.coo_matrix` fields along with the column names.
    Coordinate {
        columns: Vec<String>,
        shape: (usize, usize),
        row: Vec<usize>,
        col: Vec<usize>,
        data: Vec<f64>,
    },

    /// `DataFrame.to_dict(orient="split")`, the index is ignored.
    Split {
        columns: Vec<String>,
        data: Vec<Vec<DenseCell>>,
    },
}

/// Dense table cell: a weight or a one-hot indicator, which `get_dummies` emits as `bool`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DenseCell {
    Number(f64),
    Flag(bool),
}

impl From<DenseCell> for f64 {
    fn from(cell: DenseCell) -> Self {
        match cell {
            DenseCell::Number(value) => value,
            DenseCell::Flag(true) => 1.0,
            DenseCell::Flag(false) => 0.0,
        }
    }
}

/// Severity label of every report.
pub struct LabelColumn {
    pub name: Option<String>,
    pub values: Vec<String>,
}

impl LabelColumn {
    #[instrument(level = "debug", skip_all, fields(path = ?path))]
    pub fn load(path: impl AsRef<Path> + Debug) -> Result<Self> {
        let raw: RawLabels = read_pickle(path.as_ref())?;
        let column = match raw {
            RawLabels::List(values) => Self { name: None, values },
            RawLabels::Series { name, data } => Self { name, values: data },
            RawLabels::Frame { columns, data } => {
                ensure!(
                    columns.len() == 1,
                    "expected a single label column in `{}`, got {}",
                    path.as_ref().display(),
                    columns.len(),
                );
                let values = data
                    .into_iter()
                    .map(|row| match <[String; 1]>::try_from(row) {
                        Ok([value]) => Ok(value),
                        Err(row) => {
                            Err(anyhow!("expected a single label, got {} values", row.len()))
                        }
                    })
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("invalid labels in `{}`", path.as_ref().display()))?;
                Self {
                    name: columns.into_iter().next(),
                    values,
                }
            }
        };
        debug!(name = ?column.name, n_labels = column.len(), "loaded");
        Ok(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabels {
    /// `Series.to_list()`
    List(Vec<String>),

    Series {
        #[serde(default)]
        name: Option<String>,
        data: Vec<String>,
    },

    /// One-column `DataFrame.to_dict(orient="split")`.
    Frame {
        columns: Vec<String>,
        data: Vec<Vec<String>>,
    },
}

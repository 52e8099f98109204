//! Pre-split, pre-vectorised accident reports.

use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

pub use self::frame::{FeatureFrame, LabelColumn};
use crate::helpers::Instant;
use crate::labels::binarize;
use crate::opts::DatasetOpts;
use crate::prelude::*;
use crate::sparse::CsrMatrix;

pub mod frame;

pub struct Split {
    pub features: FeatureFrame,
    pub labels: LabelColumn,
}

impl Split {
    #[instrument(skip_all, fields(features = ?features_path, labels = ?labels_path))]
    pub fn load(
        features_path: impl AsRef<Path> + Debug,
        labels_path: impl AsRef<Path> + Debug,
    ) -> Result<Self> {
        let features = FeatureFrame::load(features_path)?;
        let labels = LabelColumn::load(labels_path)?;
        ensure!(
            features.n_rows() == labels.len(),
            "{} feature rows but {} labels",
            features.n_rows(),
            labels.len(),
        );
        Ok(Self { features, labels })
    }

    /// Compressed feature rows for the solver.
    #[must_use]
    pub fn matrix(&self) -> CsrMatrix {
        CsrMatrix::from(&self.features.matrix)
    }

    /// Binary target, `true` where the label is exactly `positive_label`.
    #[must_use]
    pub fn target(&self, positive_label: &str) -> Vec<bool> {
        binarize(&self.labels.values, positive_label)
    }
}

pub struct Dataset {
    pub train: Split,
    pub test: Split,
}

impl Dataset {
    #[instrument(skip_all, fields(data_dir = ?opts.data_dir))]
    pub fn load(opts: &DatasetOpts) -> Result<Self> {
        let start_instant = Instant::now();
        let train = Split::load(opts.x_train_path(), opts.y_train_path())
            .context("failed to load the training split")?;
        let test = Split::load(opts.x_test_path(), opts.y_test_path())
            .context("failed to load the test split")?;
        ensure!(
            train.features.columns == test.features.columns,
            "training and test features have different columns ({} vs {})",
            train.features.n_cols(),
            test.features.n_cols(),
        );
        info!(
            n_train = train.features.n_rows(),
            n_test = test.features.n_rows(),
            n_features = train.features.n_cols(),
            elapsed = %start_instant.elapsed(),
            "loaded",
        );
        Ok(Self { train, test })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.train.features.columns
    }
}

/// Reads a pickled object. The pickle must consist of plain Python types.
pub(crate) fn read_pickle<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    serde_pickle::from_reader(BufReader::new(file), Default::default())
        .with_context(|| format!("failed to decode `{}`", path.display()))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use serde::Serialize;

    use super::*;

    /// Creates an empty scratch directory, unique for the test.
    pub fn scratch_dir(name: &str) -> Result<PathBuf> {
        let path = std::env::temp_dir().join(format!(
            "fatal-factors-{}-{}",
            std::process::id(),
            name,
        ));
        if path.exists() {
            std::fs::remove_dir_all(&path)?;
        }
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    pub fn write_pickle(path: &Path, value: &impl Serialize) -> Result {
        std::fs::write(path, serde_pickle::to_vec(value, Default::default())?)?;
        Ok(())
    }

    #[derive(Serialize)]
    pub struct DenseFixture {
        pub columns: Vec<&'static str>,
        pub data: Vec<Vec<f64>>,
    }

    /// Writes a toy dataset with the default file names.
    pub fn write_toy_dataset(data_dir: &Path, test_columns: Vec<&'static str>) -> Result {
        write_pickle(
            &data_dir.join("X_train.pkl"),
            &DenseFixture {
                columns: vec!["engine", "fire", "taxi"],
                data: vec![
                    vec![0.0, 0.9, 0.0],
                    vec![0.4, 0.0, 0.8],
                    vec![0.0, 0.7, 0.1],
                    vec![0.2, 0.0, 0.9],
                ],
            },
        )?;
        write_pickle(
            &data_dir.join("X_test.pkl"),
            &DenseFixture {
                columns: test_columns,
                data: vec![vec![0.0, 0.8, 0.0], vec![0.3, 0.0, 0.7]],
            },
        )?;
        write_pickle(&data_dir.join("y_train.pkl"), &vec!["Fatal", "Minor", "Fatal", "Minor"])?;
        write_pickle(&data_dir.join("y_test.pkl"), &vec!["Fatal", "Minor"])?;
        Ok(())
    }

    pub fn dataset_opts(data_dir: PathBuf) -> DatasetOpts {
        DatasetOpts {
            data_dir,
            x_train: "X_train.pkl".into(),
            x_test: "X_test.pkl".into(),
            y_train: "y_train.pkl".into(),
            y_test: "y_test.pkl".into(),
            positive_label: "Fatal".to_string(),
        }
    }

    #[test]
    fn load_ok() -> Result {
        let data_dir = scratch_dir("dataset-load-ok")?;
        write_toy_dataset(&data_dir, vec!["engine", "fire", "taxi"])?;

        let dataset = Dataset::load(&dataset_opts(data_dir))?;
        assert_eq!(dataset.columns(), ["engine", "fire", "taxi"]);
        assert_eq!(dataset.train.target("Fatal"), [true, false, true, false]);
        assert_eq!(dataset.test.target("Fatal"), [true, false]);
        assert_eq!(dataset.train.matrix().n_rows(), 4);
        assert_eq!(dataset.test.matrix().to_dense(), [[0.0, 0.8, 0.0], [0.3, 0.0, 0.7]]);
        Ok(())
    }

    #[test]
    fn column_mismatch_fails() -> Result {
        let data_dir = scratch_dir("dataset-column-mismatch")?;
        write_toy_dataset(&data_dir, vec!["engine", "taxi", "fire"])?;
        assert!(Dataset::load(&dataset_opts(data_dir)).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_fails() -> Result {
        let data_dir = scratch_dir("dataset-missing-file")?;
        let error = match Dataset::load(&dataset_opts(data_dir)) {
            Ok(_) => panic!("expected a missing file error"),
            Err(error) => error,
        };
        assert!(format!("{:#}", error).contains("X_train.pkl"));
        Ok(())
    }

    #[test]
    fn row_count_mismatch_fails() -> Result {
        let data_dir = scratch_dir("dataset-row-count-mismatch")?;
        write_toy_dataset(&data_dir, vec!["engine", "fire", "taxi"])?;
        write_pickle(&data_dir.join("y_test.pkl"), &vec!["Fatal"])?;
        assert!(Dataset::load(&dataset_opts(data_dir)).is_err());
        Ok(())
    }
}

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::prelude::*;

/// Train and validation row indices of a single fold.
pub type FoldIndices = (Vec<usize>, Vec<usize>);

/// Stratified k-fold splitter: every fold keeps the class proportions of the whole target.
#[derive(Debug, Copy, Clone)]
pub struct StratifiedKFold {
    n_splits: usize,

    /// Shuffles the rows of each class with this seed before cutting them into folds.
    seed: Option<u64>,
}

impl StratifiedKFold {
    #[must_use]
    pub const fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Splits the rows. Indices are in ascending order within both parts.
    pub fn split(&self, target: &[bool]) -> Result<Vec<FoldIndices>> {
        let n_splits = self.n_splits;
        ensure!(n_splits >= 2, "expected at least 2 folds, got {}", n_splits);
        ensure!(
            n_splits <= target.len(),
            "cannot split {} rows into {} folds",
            target.len(),
            n_splits,
        );

        let mut rng = self.seed.map(StdRng::seed_from_u64);
        let mut fold_of = vec![0; target.len()];

        // Larger chunks of the next class start where the previous class stopped.
        let mut offset = 0;

        for class in [false, true] {
            let mut indices = target.iter().positions(|label| *label == class).collect_vec();
            if indices.len() < n_splits {
                debug!(
                    class,
                    n_rows = indices.len(),
                    n_splits,
                    "the class is smaller than the number of folds",
                );
            }
            if let Some(rng) = rng.as_mut() {
                indices.shuffle(rng);
            }

            let chunk_size = indices.len() / n_splits;
            let remainder = indices.len() % n_splits;
            let mut indices = indices.into_iter();
            for fold in 0..n_splits {
                let is_larger = (fold + n_splits - offset) % n_splits < remainder;
                for index in indices.by_ref().take(chunk_size + usize::from(is_larger)) {
                    fold_of[index] = fold;
                }
            }
            offset = (offset + remainder) % n_splits;
        }

        Ok((0..n_splits)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..target.len()).partition(|index| fold_of[*index] == fold);
                (train, test)
            })
            .collect())
    }
}

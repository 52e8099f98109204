//! Exhaustive cross-validated search over the penalty type and the regularization strength.

use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::helpers::Instant;
use crate::prelude::*;
use crate::sparse::CsrMatrix;
use crate::trainer::folds::StratifiedKFold;
use crate::trainer::logistic::{LogisticRegression, Params, Penalty, SolverParams};

/// Cartesian product of the penalties and the strengths, penalty-major.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    penalties: Vec<Penalty>,
    strengths: Vec<f64>,
}

impl ParamGrid {
    pub fn new(penalties: Vec<Penalty>, strengths: Vec<f64>) -> Result<Self> {
        ensure!(!penalties.is_empty(), "at least one penalty is required");
        ensure!(!strengths.is_empty(), "at least one regularization strength is required");
        if let Some(c) = strengths.iter().find(|c| !(c.is_finite() && **c > 0.0)) {
            bail!("C must be a positive finite number, got {}", c);
        }
        Ok(Self {
            penalties,
            strengths,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.penalties.len() * self.strengths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Params> + '_ {
        self.penalties
            .iter()
            .cartesian_product(&self.strengths)
            .map(|(penalty, c)| Params {
                penalty: *penalty,
                c: *c,
            })
    }
}

/// Cross-validation outcome of a single grid point.
#[derive(Debug, Clone, Serialize)]
pub struct CvResult {
    pub params: Params,

    /// Validation accuracy on every fold.
    pub fold_scores: Vec<f64>,

    pub mean_score: f64,

    /// Population standard deviation of the fold scores.
    pub std_score: f64,

    /// `1` for the best mean score, equal scores share the rank.
    pub rank: usize,

    /// Number of folds on which the solver hit the iteration limit.
    pub n_not_converged: usize,
}

#[derive(Debug)]
pub struct GridSearchResult {
    pub cv_results: Vec<CvResult>,
    pub best_index: usize,

    /// Best configuration refitted on the whole training set.
    pub best_estimator: LogisticRegression,
}

impl GridSearchResult {
    #[must_use]
    pub fn best(&self) -> &CvResult {
        &self.cv_results[self.best_index]
    }
}

pub struct GridSearch {
    pub grid: ParamGrid,
    pub folds: StratifiedKFold,
    pub solver: SolverParams,
}

struct Fold {
    x_train: CsrMatrix,
    y_train: Vec<bool>,
    x_test: CsrMatrix,
    y_test: Vec<bool>,
}

impl GridSearch {
    #[instrument(
        skip_all,
        fields(n_candidates = self.grid.len(), n_splits = self.folds.n_splits()),
    )]
    pub fn fit(&self, x: &CsrMatrix, y: &[bool]) -> Result<GridSearchResult> {
        ensure!(x.n_rows() == y.len(), "{} rows but {} labels", x.n_rows(), y.len());
        let start_instant = Instant::now();

        let folds = self
            .folds
            .split(y)?
            .into_iter()
            .map(|(train, test)| Fold {
                x_train: x.select_rows(&train),
                y_train: train.iter().map(|index| y[*index]).collect(),
                x_test: x.select_rows(&test),
                y_test: test.iter().map(|index| y[*index]).collect(),
            })
            .collect_vec();

        let mut cv_results = self
            .grid
            .iter()
            .collect_vec()
            .into_par_iter()
            .map(|params| self.cross_validate(params, &folds))
            .collect::<Result<Vec<_>>>()?;
        rank(&mut cv_results);
        let best_index = cv_results
            .iter()
            .position(|result| result.rank == 1)
            .ok_or_else(|| anyhow!("the grid is empty"))?;

        let best_params = cv_results[best_index].params;
        info!(
            %best_params,
            mean_score = cv_results[best_index].mean_score,
            elapsed = %start_instant.elapsed(),
            "refitting the best configuration",
        );
        let best_estimator = LogisticRegression::fit(x, y, best_params, self.solver)?;

        Ok(GridSearchResult {
            cv_results,
            best_index,
            best_estimator,
        })
    }

    fn cross_validate(&self, params: Params, folds: &[Fold]) -> Result<CvResult> {
        let mut fold_scores = Vec::with_capacity(folds.len());
        let mut n_not_converged = 0;
        for fold in folds {
            let model = LogisticRegression::fit(&fold.x_train, &fold.y_train, params, self.solver)?;
            if !model.converged {
                n_not_converged += 1;
            }
            fold_scores.push(model.score(&fold.x_test, &fold.y_test)?);
        }
        let result = CvResult {
            params,
            mean_score: fold_scores.iter().mean(),
            std_score: fold_scores.iter().population_std_dev(),
            fold_scores,
            rank: 0,
            n_not_converged,
        };
        debug!(
            %params,
            mean_score = result.mean_score,
            std_score = result.std_score,
            n_not_converged,
            "cross-validated",
        );
        Ok(result)
    }
}

/// Ranks the results by the mean score, ties take the best rank of the group.
fn rank(cv_results: &mut [CvResult]) {
    let scores = cv_results.iter().map(|result| result.mean_score).collect_vec();
    for result in cv_results.iter_mut() {
        result.rank = 1 + scores
            .iter()
            .filter(|score| score.total_cmp(&result.mean_score).is_gt())
            .count();
    }
}

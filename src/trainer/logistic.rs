//! L1/L2-regularised logistic regression.
//!
//! Minimises `(1/n) Σ logloss(yᵢ, σ(w·xᵢ + b)) + penalty(w) / (C·n)`,
//! which is the scikit-learn objective `C Σ logloss + penalty(w)` divided by `C·n`.
//! The intercept is not penalised.
//!
//! The solver is FISTA (Beck & Teboulle, 2009) with the fixed step `1/L`.

use std::fmt::{Display, Formatter};

use clap::ValueEnum;
use serde::Serialize;

use crate::prelude::*;
use crate::sparse::CsrMatrix;
use crate::trainer::loss::BCELoss;
use crate::trainer::math::{sigmoid, soft_threshold, squared_norm};
use crate::trainer::metrics::accuracy;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Penalty {
    /// `‖w‖₁`, drives the irrelevant weights to exact zeros
    L1,

    /// `½‖w‖₂²`
    L2,
}

impl Penalty {
    #[must_use]
    pub fn value(self, weights: &[f64]) -> f64 {
        match self {
            Self::L1 => weights.iter().map(|weight| weight.abs()).sum(),
            Self::L2 => 0.5 * squared_norm(weights),
        }
    }

    /// Proximal operator of `threshold · penalty`.
    #[must_use]
    #[inline]
    pub fn prox(self, weight: f64, threshold: f64) -> f64 {
        match self {
            Self::L1 => soft_threshold(weight, threshold),
            Self::L2 => weight / (1.0 + threshold),
        }
    }
}

impl Display for Penalty {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::L1 => formatter.write_str("l1"),
            Self::L2 => formatter.write_str("l2"),
        }
    }
}

/// Single hyper-parameter configuration.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Params {
    pub penalty: Penalty,

    /// Inverse of the regularization strength.
    #[serde(rename = "C")]
    pub c: f64,
}

impl Display for Params {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "penalty={}, C={}", self.penalty, self.c)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct SolverParams {
    pub max_iter: usize,

    /// The solver stops once no coefficient moves by more than this.
    pub tol: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tol: 1e-4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub params: Params,
    pub weights: Vec<f64>,
    pub intercept: f64,

    /// Final value of the regularised objective.
    pub objective: f64,

    pub n_iter: usize,
    pub converged: bool,
}

impl LogisticRegression {
    pub fn fit(x: &CsrMatrix, y: &[bool], params: Params, solver: SolverParams) -> Result<Self> {
        ensure!(x.n_rows() == y.len(), "{} rows but {} labels", x.n_rows(), y.len());
        ensure!(x.n_rows() != 0, "cannot fit on an empty training set");
        ensure!(
            params.c.is_finite() && params.c > 0.0,
            "C must be a positive finite number, got {}",
            params.c,
        );

        let n_rows = x.n_rows() as f64;

        // ‖[X 1]ᵀ[X 1]‖ ≤ max ‖xᵢ‖² + 1 per row, and σ' ≤ ¼.
        let lipschitz = 0.25
            * (0..x.n_rows())
                .map(|i| squared_norm(x.row(i).1) + 1.0)
                .fold(0.0, f64::max);
        let step = 1.0 / lipschitz;
        let threshold = step / (params.c * n_rows);

        let mut weights = vec![0.0; x.n_cols()];
        let mut intercept = 0.0;
        let mut extrapolated_weights = weights.clone();
        let mut extrapolated_intercept = intercept;
        let mut momentum: f64 = 1.0;

        let mut n_iter = 0;
        let mut converged = false;
        while n_iter < solver.max_iter {
            n_iter += 1;

            let (gradient, intercept_gradient) =
                gradient(x, y, &extrapolated_weights, extrapolated_intercept);
            let next_weights = extrapolated_weights
                .iter()
                .zip(&gradient)
                .map(|(weight, gradient)| params.penalty.prox(weight - step * gradient, threshold))
                .collect_vec();
            let next_intercept = extrapolated_intercept - step * intercept_gradient;

            let max_change = next_weights
                .iter()
                .zip(&weights)
                .map(|(next, current)| (next - current).abs())
                .fold((next_intercept - intercept).abs(), f64::max);
            ensure!(max_change.is_finite(), "the solver diverged at iteration #{}", n_iter);

            let next_momentum = (1.0 + (1.0 + 4.0 * momentum * momentum).sqrt()) / 2.0;
            let beta = (momentum - 1.0) / next_momentum;
            for ((extrapolated, next), current) in
                extrapolated_weights.iter_mut().zip(&next_weights).zip(&weights)
            {
                *extrapolated = next + beta * (next - current);
            }
            extrapolated_intercept = next_intercept + beta * (next_intercept - intercept);

            weights = next_weights;
            intercept = next_intercept;
            momentum = next_momentum;

            if max_change < solver.tol {
                converged = true;
                break;
            }
        }

        let mut model = Self {
            params,
            weights,
            intercept,
            objective: f64::NAN,
            n_iter,
            converged,
        };
        model.objective = model.objective(x, y);
        if converged {
            debug!(%params, n_iter, objective = model.objective, "converged");
        } else {
            warn!(%params, n_iter, objective = model.objective, "the solver did not converge");
        }
        Ok(model)
    }

    /// Logits `w·xᵢ + b` of the rows.
    pub fn decision_function(&self, x: &CsrMatrix) -> Result<Vec<f64>> {
        ensure!(
            x.n_cols() == self.weights.len(),
            "the model is fitted on {} features, got {}",
            self.weights.len(),
            x.n_cols(),
        );
        Ok(x.mul_vec(&self.weights)
            .into_iter()
            .map(|logit| logit + self.intercept)
            .collect())
    }

    /// Predicts the positive class where its probability exceeds ½.
    pub fn predict(&self, x: &CsrMatrix) -> Result<Vec<bool>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|logit| logit > 0.0)
            .collect())
    }

    /// Accuracy on the given rows.
    pub fn score(&self, x: &CsrMatrix, y: &[bool]) -> Result<f64> {
        ensure!(x.n_rows() == y.len(), "{} rows but {} labels", x.n_rows(), y.len());
        Ok(accuracy(&self.predict(x)?, y))
    }

    fn objective(&self, x: &CsrMatrix, y: &[bool]) -> f64 {
        let mut loss = BCELoss::default();
        for (i, label) in y.iter().enumerate() {
            loss.push_logit(x.dot_row(i, &self.weights) + self.intercept, *label);
        }
        loss.finalise()
            + self.params.penalty.value(&self.weights) / (self.params.c * x.n_rows() as f64)
    }
}

/// Gradient of the mean log-loss with respect to the weights and the intercept.
fn gradient(x: &CsrMatrix, y: &[bool], weights: &[f64], intercept: f64) -> (Vec<f64>, f64) {
    let n_rows = y.len() as f64;
    let residuals = y
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let target = if *label { 1.0 } else { 0.0 };
            (sigmoid(x.dot_row(i, weights) + intercept) - target) / n_rows
        })
        .collect_vec();
    (x.transpose_mul_vec(&residuals), residuals.iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::CooMatrix;

    fn matrix(dense: &[Vec<f64>]) -> Result<CsrMatrix> {
        Ok(CsrMatrix::from(&CooMatrix::from_dense(dense, dense[0].len())?))
    }

    /// The first column fires on the fatal reports only.
    fn toy() -> Result<(CsrMatrix, Vec<bool>)> {
        let x = matrix(&[
            vec![1.0, 0.0, 0.2],
            vec![0.0, 1.0, 0.3],
            vec![0.9, 0.1, 0.0],
            vec![0.0, 0.8, 0.1],
        ])?;
        Ok((x, vec![true, false, true, false]))
    }

    #[test]
    fn fit_toy_ok() -> Result {
        let (x, y) = toy()?;
        let params = Params {
            penalty: Penalty::L2,
            c: 1.0,
        };
        let model = LogisticRegression::fit(&x, &y, params, SolverParams::default())?;
        assert!(model.converged);
        assert_eq!(model.weights.len(), 3);
        assert!(model.weights[0] > 0.0);
        assert!(model.weights[1] < 0.0);
        assert!(model.objective.is_finite());
        let train_accuracy = model.score(&x, &y)?;
        assert!((0.0..=1.0).contains(&train_accuracy));
        Ok(())
    }

    #[test]
    fn weak_regularization_separates_ok() -> Result {
        let (x, y) = toy()?;
        let params = Params {
            penalty: Penalty::L2,
            c: 100.0,
        };
        let model = LogisticRegression::fit(&x, &y, params, SolverParams::default())?;
        assert_eq!(model.predict(&x)?, y);
        assert!((model.score(&x, &y)? - 1.0).abs() < f64::EPSILON);
        let logits = model.decision_function(&x)?;
        assert!(sigmoid(logits[0]) > 0.5 && sigmoid(logits[1]) < 0.5);
        Ok(())
    }

    #[test]
    fn l1_zeroes_irrelevant_weights_ok() -> Result {
        // The last column is identical across the classes.
        let x = matrix(&[
            vec![1.0, 0.0, 0.5],
            vec![0.0, 1.0, 0.5],
            vec![1.0, 0.0, 0.5],
            vec![0.0, 1.0, 0.5],
            vec![1.0, 0.0, 0.5],
            vec![0.0, 1.0, 0.5],
        ])?;
        let y = [true, false, true, false, true, false];
        let params = Params {
            penalty: Penalty::L1,
            c: 1.0,
        };
        let solver = SolverParams {
            max_iter: 5000,
            tol: 1e-8,
        };
        let model = LogisticRegression::fit(&x, &y, params, solver)?;
        assert!(model.weights[0] > 0.0);
        assert!(model.weights[1] < 0.0);
        assert!(model.weights[2].abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn strong_l1_gives_zero_weights_ok() -> Result {
        let (x, y) = toy()?;
        let params = Params {
            penalty: Penalty::L1,
            c: 1e-3,
        };
        let model = LogisticRegression::fit(&x, &y, params, SolverParams::default())?;
        assert!(model.weights.iter().all(|weight| *weight == 0.0));
        Ok(())
    }

    #[test]
    fn max_iter_reached_ok() -> Result {
        let (x, y) = toy()?;
        let params = Params {
            penalty: Penalty::L2,
            c: 1e6,
        };
        let solver = SolverParams {
            max_iter: 2,
            tol: 1e-12,
        };
        let model = LogisticRegression::fit(&x, &y, params, solver)?;
        assert!(!model.converged);
        assert_eq!(model.n_iter, 2);
        Ok(())
    }

    #[test]
    fn fit_is_deterministic_ok() -> Result {
        let (x, y) = toy()?;
        let params = Params {
            penalty: Penalty::L1,
            c: 10.0,
        };
        let first = LogisticRegression::fit(&x, &y, params, SolverParams::default())?;
        let second = LogisticRegression::fit(&x, &y, params, SolverParams::default())?;
        assert_eq!(first.weights, second.weights);
        assert_eq!(first.intercept, second.intercept);
        Ok(())
    }

    #[test]
    fn feature_count_mismatch_fails() -> Result {
        let (x, y) = toy()?;
        let model = LogisticRegression::fit(
            &x,
            &y,
            Params {
                penalty: Penalty::L2,
                c: 1.0,
            },
            SolverParams::default(),
        )?;
        let other = matrix(&[vec![1.0, 0.0]])?;
        assert!(model.predict(&other).is_err());
        Ok(())
    }

    #[test]
    fn empty_training_set_fails() -> Result {
        let x = CsrMatrix::from(&CooMatrix::from_dense(&[], 3)?);
        let params = Params {
            penalty: Penalty::L2,
            c: 1.0,
        };
        assert!(LogisticRegression::fit(&x, &[], params, SolverParams::default()).is_err());
        Ok(())
    }
}

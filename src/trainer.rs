//! Logistic regression model selection.

pub use self::folds::StratifiedKFold;
pub use self::grid::{CvResult, GridSearch, ParamGrid};
pub use self::logistic::{Params, Penalty, SolverParams};

pub mod folds;
pub mod grid;
pub mod logistic;
pub mod loss;
pub mod math;
pub mod metrics;

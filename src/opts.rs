//! CLI options.

pub mod parsers;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::trainer::Penalty;

#[derive(Parser)]
#[command(version, about)]
pub struct Opts {
    #[command(subcommand)]
    pub subcommand: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Analyze(AnalyzeOpts),
    Describe(DescribeOpts),
}

/// Runs the complete analysis: baseline, grid search, evaluation and weight inspection
#[derive(Args)]
pub struct AnalyzeOpts {
    #[command(flatten)]
    pub dataset: DatasetOpts,

    #[command(flatten)]
    pub grid: GridOpts,

    #[command(flatten)]
    pub solver: SolverOpts,

    /// Number of the highest weights to display
    #[arg(long, default_value = "30")]
    pub top: usize,

    /// Number of the lowest weights to display
    #[arg(long, default_value = "0")]
    pub bottom: usize,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,
}

/// Prints the dataset shapes, density and label counts
#[derive(Args)]
pub struct DescribeOpts {
    #[command(flatten)]
    pub dataset: DatasetOpts,
}

#[derive(Args)]
pub struct DatasetOpts {
    /// Directory with the pickled artifacts
    #[arg(long, default_value = "data", env = "FATAL_FACTORS_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Training feature matrix file name
    #[arg(long, default_value = "X_train.pkl")]
    pub x_train: PathBuf,

    /// Test feature matrix file name
    #[arg(long, default_value = "X_test.pkl")]
    pub x_test: PathBuf,

    /// Training labels file name
    #[arg(long, default_value = "y_train.pkl")]
    pub y_train: PathBuf,

    /// Test labels file name
    #[arg(long, default_value = "y_test.pkl")]
    pub y_test: PathBuf,

    /// Label value treated as the positive class (exact, case-sensitive match)
    #[arg(long, default_value = "Fatal")]
    pub positive_label: String,
}

impl DatasetOpts {
    pub fn x_train_path(&self) -> PathBuf {
        self.data_dir.join(&self.x_train)
    }

    pub fn x_test_path(&self) -> PathBuf {
        self.data_dir.join(&self.x_test)
    }

    pub fn y_train_path(&self) -> PathBuf {
        self.data_dir.join(&self.y_train)
    }

    pub fn y_test_path(&self) -> PathBuf {
        self.data_dir.join(&self.y_test)
    }
}

/// Hyper-parameter grid and cross-validation options.
#[derive(Args)]
pub struct GridOpts {
    /// Penalty types to try
    #[arg(
        long = "penalty",
        value_enum,
        value_delimiter = ',',
        default_values_t = [Penalty::L1, Penalty::L2],
    )]
    pub penalties: Vec<Penalty>,

    /// Inverse regularization strengths to try
    #[arg(
        long = "c",
        value_delimiter = ',',
        default_values_t = [0.01, 0.1, 1.0, 10.0, 100.0],
        value_parser = parsers::positive_f64,
    )]
    pub strengths: Vec<f64>,

    /// Number of cross-validation folds
    #[arg(long, default_value = "5", value_parser = parsers::at_least_two)]
    pub n_folds: usize,

    /// Shuffle the rows before splitting them into folds
    #[arg(long)]
    pub shuffle: bool,

    /// Seed of the fold shuffling
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

/// Logistic regression solver options.
#[derive(Args, Clone, Copy)]
pub struct SolverOpts {
    /// Maximum number of solver iterations
    #[arg(long, default_value = "1000", value_parser = parsers::non_zero_usize)]
    pub max_iter: usize,

    /// Tolerance of the stopping criterion
    #[arg(long, default_value = "0.0001", value_parser = parsers::positive_f64)]
    pub tol: f64,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

pub fn parse() -> Opts {
    Opts::parse()
}

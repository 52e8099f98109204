//! Human-readable and JSON renderings of the analysis.

use comfy_table::{Cell, CellAlignment, ColumnConstraint, Table, Width};
use serde::Serialize;

use crate::inspector::FeatureWeight;
use crate::prelude::*;
use crate::trainer::{CvResult, Params};

const MIN_COLUMN_WIDTH: u16 = 3;

#[derive(Serialize)]
pub struct Report<'a> {
    pub positive_label: &'a str,
    pub baseline_accuracy: f64,
    pub cv_results: &'a [CvResult],
    pub best_params: Params,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub intercept: f64,
    pub converged: bool,
    pub n_iter: usize,
    pub top_weights: Vec<FeatureWeight<'a>>,
    pub bottom_weights: Vec<FeatureWeight<'a>>,
}

impl<'a> Report<'a> {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize the report")
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "Baseline accuracy (always the majority class): {:.4}\n\n",
            self.baseline_accuracy,
        );
        text.push_str(&format!("Grid search:\n{}\n\n", cv_table(self.cv_results)));
        text.push_str(&format!("Best parameters: {}\n", self.best_params));
        if !self.converged {
            text.push_str(&format!(
                "The solver did not converge in {} iterations on the whole training set.\n",
                self.n_iter,
            ));
        }
        text.push_str(&format!("Training accuracy: {:.4}\n", self.train_accuracy));
        text.push_str(&format!("Test accuracy: {:.4}\n", self.test_accuracy));
        if self.test_accuracy <= self.baseline_accuracy {
            text.push_str("The model does not beat the baseline.\n");
        }

        if !self.top_weights.is_empty() {
            text.push_str(&format!(
                "\nTop {} weights towards «{}»:\n{}\n",
                self.top_weights.len(),
                self.positive_label,
                weight_table(&self.top_weights),
            ));
        }
        if !self.bottom_weights.is_empty() {
            text.push_str(&format!(
                "\nBottom {} weights, away from «{}»:\n{}\n",
                self.bottom_weights.len(),
                self.positive_label,
                weight_table(&self.bottom_weights),
            ));
        }
        text
    }
}

pub struct SplitSummary {
    pub name: &'static str,
    pub n_rows: usize,
    pub n_cols: usize,
    pub nnz: usize,
    pub density: f64,
    pub n_positive: usize,
}

pub struct DatasetSummary<'a> {
    pub positive_label: &'a str,
    pub splits: Vec<SplitSummary>,

    /// Label, its count in the training split and in the test split.
    pub label_counts: Vec<(&'a str, usize, usize)>,

    pub baseline_accuracy: f64,
}

impl<'a> DatasetSummary<'a> {
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut splits = new_table();
        splits.set_header(vec!["split", "rows", "columns", "non-zeros", "density", "positive"]);
        for split in &self.splits {
            splits.add_row(vec![
                split.name.to_string(),
                split.n_rows.to_string(),
                split.n_cols.to_string(),
                split.nnz.to_string(),
                format!("{:.6}", split.density),
                split.n_positive.to_string(),
            ]);
        }
        align_right(&mut splits, 1);

        let mut labels = new_table();
        labels.set_header(vec!["label", "train", "test"]);
        for (label, n_train, n_test) in &self.label_counts {
            labels.add_row(vec![label.to_string(), n_train.to_string(), n_test.to_string()]);
        }
        align_right(&mut labels, 1);

        format!(
            "{}\n\n{}\n\nPositive class: «{}»\nBaseline test accuracy: {:.4}\n",
            splits, labels, self.positive_label, self.baseline_accuracy,
        )
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset("||--+-++|    ++++++");
    table
}

/// Right-aligns the numeric columns, starting from `first` column.
fn align_right(table: &mut Table, first: usize) {
    table.column_iter_mut().enumerate().for_each(|(i, column)| {
        column
            .set_constraint(ColumnConstraint::LowerBoundary(Width::Fixed(MIN_COLUMN_WIDTH)))
            .set_cell_alignment(if i >= first {
                CellAlignment::Right
            } else {
                CellAlignment::Left
            });
    });
}

fn cv_table(cv_results: &[CvResult]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["rank", "penalty", "C", "mean accuracy", "std", "not converged"]);
    for result in cv_results {
        table.add_row(vec![
            Cell::new(result.rank),
            Cell::new(result.params.penalty),
            Cell::new(result.params.c),
            Cell::new(format!("{:.4}", result.mean_score)),
            Cell::new(format!("{:.4}", result.std_score)),
            Cell::new(result.n_not_converged),
        ]);
    }
    align_right(&mut table, 2);
    table
}

fn weight_table(weights: &[FeatureWeight]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["feature", "weight"]);
    for weight in weights {
        table.add_row(vec![weight.feature.to_string(), format!("{:.4}", weight.weight)]);
    }
    align_right(&mut table, 1);
    table
}

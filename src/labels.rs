//! Severity labels and the majority-class baseline.

use crate::prelude::*;

/// Marks the labels exactly equal to `positive` (case-sensitive, no trimming).
///
/// A label taxonomy without the exact `positive` value silently yields an all-`false` target.
/// Only a warning is logged for that.
#[must_use]
pub fn binarize(labels: &[String], positive: &str) -> Vec<bool> {
    let target = labels.iter().map(|label| label == positive).collect_vec();
    if !labels.is_empty() && !target.contains(&true) {
        warn!(positive, n_labels = labels.len(), "no label matches the positive class");
    }
    target
}

/// Number of occurrences of every distinct label, in the first-seen order.
#[must_use]
pub fn value_counts(labels: &[String]) -> Vec<(&str, usize)> {
    let counts = labels.iter().map(String::as_str).counts();
    labels
        .iter()
        .map(String::as_str)
        .unique()
        .map(|label| (label, counts[label]))
        .collect()
}

/// Accuracy of always predicting the most frequent class.
pub fn baseline_accuracy(target: &[bool]) -> Result<f64> {
    ensure!(!target.is_empty(), "cannot compute the baseline on an empty target");
    let n_positive = target.iter().filter(|is_positive| **is_positive).count();
    let n_majority = n_positive.max(target.len() - n_positive);
    Ok(n_majority as f64 / target.len() as f64)
}

//! Pairs the fitted weights with the feature names for manual interpretation.

use serde::Serialize;

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight<'a> {
    pub feature: &'a str,
    pub weight: f64,
}

/// Highest `n` weights, descending. Equal weights keep the column order.
///
/// Negative zeros are reported as positive zeros.
pub fn top_weights<'a>(
    columns: &'a [String],
    weights: &[f64],
    n: usize,
) -> Result<Vec<FeatureWeight<'a>>> {
    Ok(feature_weights(columns, weights)?
        .into_iter()
        .sorted_by(|left, right| right.weight.total_cmp(&left.weight))
        .take(n)
        .collect())
}

/// Lowest `n` weights, ascending. Equal weights keep the column order.
pub fn bottom_weights<'a>(
    columns: &'a [String],
    weights: &[f64],
    n: usize,
) -> Result<Vec<FeatureWeight<'a>>> {
    Ok(feature_weights(columns, weights)?
        .into_iter()
        .sorted_by(|left, right| left.weight.total_cmp(&right.weight))
        .take(n)
        .collect())
}

fn feature_weights<'a>(columns: &'a [String], weights: &[f64]) -> Result<Vec<FeatureWeight<'a>>> {
    ensure!(
        columns.len() == weights.len(),
        "{} feature names for {} weights",
        columns.len(),
        weights.len(),
    );
    Ok(columns
        .iter()
        .zip(weights)
        .map(|(feature, weight)| FeatureWeight {
            feature,
            weight: positive_zero(*weight),
        })
        .collect())
}

/// `total_cmp` orders `-0.0` before `0.0`, adding zero turns the former into the latter.
#[inline]
fn positive_zero(weight: f64) -> f64 {
    weight + 0.0
}

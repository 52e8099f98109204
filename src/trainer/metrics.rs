/// Share of the predictions equal to the target.
#[must_use]
pub fn accuracy(predictions: &[bool], target: &[bool]) -> f64 {
    debug_assert_eq!(predictions.len(), target.len());
    if target.is_empty() {
        return 0.0;
    }
    let n_correct = predictions
        .iter()
        .zip(target)
        .filter(|(prediction, label)| prediction == label)
        .count();
    n_correct as f64 / target.len() as f64
}

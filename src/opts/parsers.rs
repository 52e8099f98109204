use std::str::FromStr;

use crate::prelude::*;

pub fn non_zero_usize(value: &str) -> Result<usize> {
    match FromStr::from_str(value)? {
        value if value >= 1 => Ok(value),
        _ => Err(anyhow!("expected a positive number")),
    }
}

/// Cross-validation needs at least one fold to hold out and one to train on.
pub fn at_least_two(value: &str) -> Result<usize> {
    match FromStr::from_str(value)? {
        value if value >= 2 => Ok(value),
        value => Err(anyhow!("expected at least 2, got {}", value)),
    }
}

pub fn positive_f64(value: &str) -> Result<f64> {
    match f64::from_str(value)? {
        value if value.is_finite() && value > 0.0 => Ok(value),
        value => Err(anyhow!("{} is not a positive finite number", value)),
    }
}

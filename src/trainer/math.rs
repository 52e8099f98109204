#[must_use]
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let exp = x.exp();
        exp / (1.0 + exp)
    }
}

/// `ln(1 + eˣ)` without overflowing for large `x`.
#[must_use]
#[inline]
pub fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Proximal operator of `threshold · |x|`.
#[must_use]
#[inline]
pub fn soft_threshold(x: f64, threshold: f64) -> f64 {
    debug_assert!(threshold >= 0.0);
    x.signum() * (x.abs() - threshold).max(0.0)
}

#[must_use]
pub fn squared_norm(x: &[f64]) -> f64 {
    x.iter().map(|xi| xi * xi).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_ok() {
        assert!((sigmoid(0.0) - 0.5).abs() < f64::EPSILON);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!((sigmoid(1000.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn softplus_ok() {
        assert!((softplus(0.0) - 2.0_f64.ln()).abs() < 1e-12);
        assert!((softplus(1000.0) - 1000.0).abs() < 1e-9);
        assert!(softplus(-1000.0).abs() < 1e-12);
    }

    #[test]
    fn soft_threshold_ok() {
        assert!((soft_threshold(3.0, 1.0) - 2.0).abs() < f64::EPSILON);
        assert!((soft_threshold(-3.0, 1.0) + 2.0).abs() < f64::EPSILON);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
        assert_eq!(soft_threshold(-0.5, 1.0), 0.0);
    }
}

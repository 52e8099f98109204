use crate::trainer::math::softplus;

/// Binary cross-entropy loss, accumulated from the logits.
#[derive(Default, Copy, Clone)]
pub struct BCELoss {
    loss: f64,
    n: usize,
}

impl BCELoss {
    #[inline]
    pub fn push_logit(&mut self, logit: f64, label: bool) {
        // -ln σ(z) = ln(1 + e⁻ᶻ) and -ln(1 - σ(z)) = ln(1 + eᶻ).
        self.loss += if label { softplus(-logit) } else { softplus(logit) };
        self.n += 1;
    }

    /// Mean loss per sample.
    #[must_use]
    pub fn finalise(&self) -> f64 {
        self.loss / self.n.max(1) as f64
    }
}

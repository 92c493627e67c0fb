//! Overflow-safe maps between a probability and the real line.
//!
//! Rates in `(0, 1)` are optimized as `θ = logit(p)`; the inverse is the
//! logistic function. Both are guarded so that extreme inputs neither
//! overflow nor land exactly on 0 or 1.

/// Clamp margin that keeps probabilities strictly inside `(0, 1)`.
pub const LOGIT_EPS: f64 = 1e-12;

/// Eigenvalues at or below this are treated as zero when inverting an
/// information matrix.
pub const EIGEN_EPS: f64 = 1e-10;

/// Logistic `1 / (1 + e^{-x})`, evaluated on the side that cannot overflow.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(p / (1 − p))` with `p` clamped to `[LOGIT_EPS, 1 − LOGIT_EPS]`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

/// Derivative of the logistic map, `σ(x)(1 − σ(x))`.
///
/// This is the Jacobian factor of the delta method for a rate fitted on the
/// logit scale.
pub fn logistic_derivative(x: f64) -> f64 {
    let s = safe_logistic(x);
    s * (1.0 - s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // logit and logistic invert each other and stay finite at the extremes.
    fn logit_and_logistic_are_inverse() {
        for p in [1e-6, 0.1, 0.5, 0.9, 1.0 - 1e-6] {
            assert_relative_eq!(safe_logistic(safe_logit(p)), p, max_relative = 1e-9);
        }
        assert!(safe_logit(0.0).is_finite());
        assert!(safe_logit(1.0).is_finite());
        assert_eq!(safe_logistic(-800.0), 0.0);
        assert_eq!(safe_logistic(800.0), 1.0);
        assert_relative_eq!(logistic_derivative(0.0), 0.25);
    }
}

//! Error-rate and discard-rate models.
//!
//! Rate models map a repetition count `k` to a probability in `[0, 1]`. They
//! are supplied by the calling experiment from device calibration and are
//! passed around as plain function references ([`RateFn`]); an absent model
//! means a rate of zero.
//!
//! [`DepolarizingRate`] is the usual model for `k` repetitions of a noisy
//! controlled unitary, `q(k) = 1 - (1 - λ)^k`.
use crate::estimation::errors::{QPEError, QPEResult};

/// Function-typed rate model `k → rate`.
///
/// `Sync` so the same model can be shared by parallel bootstrap trials.
pub type RateFn<'a> = &'a (dyn Fn(u32) -> f64 + Sync);

/// Evaluate an optional rate model at `k`, defaulting to zero.
///
/// Errors
/// ------
/// - `QPEError::RateOutOfRange` when the model returns a non-finite value or
///   one outside `[0, 1]`.
pub fn eval_rate(model: Option<RateFn<'_>>, k: u32) -> QPEResult<f64> {
    match model {
        None => Ok(0.0),
        Some(rate_fn) => {
            let rate = rate_fn(k);
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(QPEError::RateOutOfRange { k, rate });
            }
            Ok(rate)
        }
    }
}

/// `DepolarizingRate` — per-repetition depolarizing error `λ`.
///
/// After `k` repetitions the contrast is `(1 - λ)^k`, so the error rate seen
/// by the likelihood is `1 - (1 - λ)^k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepolarizingRate {
    lambda: f64,
}

impl DepolarizingRate {
    /// Errors
    /// ------
    /// - `QPEError::InvalidLambda` unless `0 <= lambda <= 1`.
    pub fn new(lambda: f64) -> QPEResult<Self> {
        if !lambda.is_finite() || !(0.0..=1.0).contains(&lambda) {
            return Err(QPEError::InvalidLambda { value: lambda });
        }
        Ok(DepolarizingRate { lambda })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Error rate after `k` repetitions.
    pub fn rate(&self, k: u32) -> f64 {
        1.0 - (1.0 - self.lambda).powf(f64::from(k))
    }

    /// Borrow as a closure usable wherever a [`RateFn`] is expected.
    pub fn as_fn(&self) -> impl Fn(u32) -> f64 + Sync + '_ {
        move |k| self.rate(k)
    }
}

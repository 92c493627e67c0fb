//! Mock measurement source for testing estimators without hardware.
//!
//! Purpose
//! -------
//! Generate synthetic shots `(k, β, m)` from a known eigenphase mixture under
//! the same noise model the estimator assumes, so estimator behavior can be
//! checked against ground truth.
//!
//! Key behaviors
//! -------------
//! - The source state is a mixture of eigenphases `φⱼ` with non-negative
//!   amplitudes (normalized at construction).
//! - `P(m = 0 | k, β) = Σ aⱼ · L(k, β − ω(k), 0, φⱼ)` with the error rate
//!   `q(k)` inside `L` and an optional coherent over-rotation `ω(k)`.
//! - A shot is discarded with probability `d(k)` before the outcome is drawn.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one eigenphase, all phases finite, amplitudes finite,
//!   non-negative, and with positive sum.
//! - All randomness comes from the caller's generator.
use crate::estimation::{
    core::{
        likelihood::noise_aware_likelihood,
        measurement::{Measurement, MeasurementSet, Outcome},
        rates::{RateFn, eval_rate},
    },
    errors::{QPEError, QPEResult},
};
use rand::Rng;

/// Coherent phase-shift model `k → ω(k)` in half turns.
pub type ShiftFn<'a> = &'a (dyn Fn(u32) -> f64 + Sync);

/// MockBackend — synthetic shot generator over an eigenphase mixture.
///
/// Fields
/// ------
/// - `phases`: `Vec<f64>`
///   Eigenphases in half turns.
/// - `weights`: `Vec<f64>`
///   Normalized mixture weights (sum to one).
/// - `error_rate`, `discard_rate`: `Option<RateFn>`
///   Optional rate models; absent means zero.
/// - `phase_shift`: `Option<ShiftFn>`
///   Optional coherent over-rotation; absent means zero.
#[derive(Clone)]
pub struct MockBackend<'a> {
    phases: Vec<f64>,
    weights: Vec<f64>,
    error_rate: Option<RateFn<'a>>,
    phase_shift: Option<ShiftFn<'a>>,
    discard_rate: Option<RateFn<'a>>,
}

impl std::fmt::Debug for MockBackend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("phases", &self.phases)
            .field("weights", &self.weights)
            .field("error_rate", &self.error_rate.is_some())
            .field("phase_shift", &self.phase_shift.is_some())
            .field("discard_rate", &self.discard_rate.is_some())
            .finish()
    }
}

impl<'a> MockBackend<'a> {
    /// Build a noiseless source over an eigenphase mixture.
    ///
    /// Errors
    /// ------
    /// - `QPEError::LengthMismatch` when `amplitudes.len() != phases.len()`.
    /// - `QPEError::InvalidMixture` for an empty mixture, a non-finite phase,
    ///   a negative or non-finite amplitude, or zero total amplitude.
    pub fn new(phases: Vec<f64>, amplitudes: Vec<f64>) -> QPEResult<Self> {
        if amplitudes.len() != phases.len() {
            return Err(QPEError::LengthMismatch {
                what: "amplitudes",
                expected: phases.len(),
                actual: amplitudes.len(),
            });
        }
        if phases.is_empty() {
            return Err(QPEError::InvalidMixture { reason: "At least one eigenphase is required." });
        }
        if phases.iter().any(|p| !p.is_finite()) {
            return Err(QPEError::InvalidMixture { reason: "Eigenphases must be finite." });
        }
        if amplitudes.iter().any(|a| !a.is_finite() || *a < 0.0) {
            return Err(QPEError::InvalidMixture {
                reason: "Amplitudes must be finite and non-negative.",
            });
        }
        let total: f64 = amplitudes.iter().sum();
        if total <= 0.0 {
            return Err(QPEError::InvalidMixture { reason: "Amplitudes must have positive sum." });
        }
        let weights = amplitudes.iter().map(|a| a / total).collect();
        Ok(MockBackend { phases, weights, error_rate: None, phase_shift: None, discard_rate: None })
    }

    /// Source prepared in a single eigenstate with phase `phi`.
    ///
    /// Errors
    /// ------
    /// - `QPEError::InvalidMixture` when `phi` is not finite.
    pub fn single(phi: f64) -> QPEResult<Self> {
        MockBackend::new(vec![phi], vec![1.0])
    }

    pub fn with_error_rate(mut self, error_rate: RateFn<'a>) -> Self {
        self.error_rate = Some(error_rate);
        self
    }

    pub fn with_phase_shift(mut self, phase_shift: ShiftFn<'a>) -> Self {
        self.phase_shift = Some(phase_shift);
        self
    }

    pub fn with_discard_rate(mut self, discard_rate: RateFn<'a>) -> Self {
        self.discard_rate = Some(discard_rate);
        self
    }

    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Probability of outcome 0 for a shot at `(k, beta)`.
    ///
    /// Errors
    /// ------
    /// - `QPEError::InvalidK` when `k == 0`.
    /// - `QPEError::RateOutOfRange` from the error-rate model.
    pub fn p0(&self, k: u32, beta: f64) -> QPEResult<f64> {
        if k == 0 {
            return Err(QPEError::InvalidK { k });
        }
        let q = eval_rate(self.error_rate, k)?;
        let shift = self.phase_shift.map_or(0.0, |omega| omega(k));
        Ok(self
            .phases
            .iter()
            .zip(&self.weights)
            .map(|(&phi, &w)| w * noise_aware_likelihood(k, beta - shift, Outcome::Zero, phi, q))
            .sum())
    }

    /// Draw one shot at `(k, beta)`.
    ///
    /// Errors
    /// ------
    /// - `QPEError::InvalidK`, `QPEError::InvalidBeta`,
    ///   `QPEError::RateOutOfRange`.
    pub fn measure<R: Rng + ?Sized>(
        &self, k: u32, beta: f64, rng: &mut R,
    ) -> QPEResult<Measurement> {
        let p0 = self.p0(k, beta)?;
        let d = eval_rate(self.discard_rate, k)?;
        if d > 0.0 && rng.random::<f64>() < d {
            return Measurement::new(k, beta, None);
        }
        let m = if rng.random::<f64>() <= p0 { Outcome::Zero } else { Outcome::One };
        Measurement::new(k, beta, Some(m))
    }

    /// Draw one shot per `(ks[i], betas[i])` pair, in order.
    ///
    /// Errors
    /// ------
    /// - `QPEError::LengthMismatch` when the columns disagree in length.
    /// - Any error of [`measure`](Self::measure).
    pub fn simulate<R: Rng + ?Sized>(
        &self, ks: &[u32], betas: &[f64], rng: &mut R,
    ) -> QPEResult<MeasurementSet> {
        if betas.len() != ks.len() {
            return Err(QPEError::LengthMismatch {
                what: "betas",
                expected: ks.len(),
                actual: betas.len(),
            });
        }
        ks.iter().zip(betas).map(|(&k, &beta)| self.measure(k, beta, rng)).collect()
    }
}

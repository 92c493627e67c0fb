//! Noise-aware single-shot likelihood for iterative phase estimation.
//!
//! Purpose
//! -------
//! Evaluate `P(m | k, β, φ)` for one shot of a Hadamard-test style QPE circuit
//! under a visibility-reducing (depolarizing) noise model:
//!
//! `L = ½ · (1 + (1 − q) · (−1)^m · cos(π (k φ + β)))`
//!
//! Key behaviors
//! -------------
//! - [`noise_aware_likelihood`] evaluates a single phase.
//! - [`noise_aware_likelihood_grid`] broadcasts elementwise over an array of
//!   phases.
//! - [`likelihood_on_grid`] resolves `q = error_rate(k)` from an optional rate
//!   model, validating it, and evaluates over a [`PhaseGrid`].
//!
//! Invariants & assumptions
//! ------------------------
//! - For `q ∈ [0, 1]` the likelihood lies in `[0, 1]`, and the two outcomes sum
//!   to one.
//! - `q = 0` is the ideal likelihood; `q = 1` collapses to the uniform `0.5`.
//! - The raw functions do not validate `q`; callers are responsible for it.
//!
//! Conventions
//! -----------
//! - `φ` and `β` are in half turns (angle `πφ`), identified modulo 2.
//! - A coherent over-rotation `ω(k)` is modelled by evaluating at `β − ω(k)`.
use crate::estimation::{
    core::{
        grid::PhaseGrid,
        measurement::Outcome,
        rates::{RateFn, eval_rate},
    },
    errors::{QPEError, QPEResult},
};
use ndarray::{Array1, ArrayView1};
use std::f64::consts::PI;

/// Likelihood of outcome `m` at a single phase `phi`.
#[inline]
pub fn noise_aware_likelihood(k: u32, beta: f64, m: Outcome, phi: f64, q: f64) -> f64 {
    0.5 * (1.0 + (1.0 - q) * m.sign() * (PI * (f64::from(k) * phi + beta)).cos())
}

/// Likelihood of outcome `m` evaluated elementwise over `phi`.
pub fn noise_aware_likelihood_grid(
    k: u32, beta: f64, m: Outcome, phi: ArrayView1<'_, f64>, q: f64,
) -> Array1<f64> {
    let visibility = 0.5 * (1.0 - q) * m.sign();
    let k = f64::from(k);
    phi.mapv(|p| 0.5 + visibility * (PI * (k * p + beta)).cos())
}

/// Likelihood over a grid with `q` taken from an optional error-rate model.
///
/// Errors
/// ------
/// - `QPEError::InvalidK` when `k == 0`.
/// - `QPEError::InvalidBeta` when `beta` is not finite (reported at index 0).
/// - `QPEError::RateOutOfRange` when the model returns a value outside
///   `[0, 1]`.
pub fn likelihood_on_grid(
    grid: &PhaseGrid, k: u32, beta: f64, m: Outcome, error_rate: Option<RateFn<'_>>,
) -> QPEResult<Array1<f64>> {
    if k == 0 {
        return Err(QPEError::InvalidK { k });
    }
    if !beta.is_finite() {
        return Err(QPEError::InvalidBeta { index: 0, value: beta });
    }
    let q = eval_rate(error_rate, k)?;
    Ok(noise_aware_likelihood_grid(k, beta, m, grid.points().view(), q))
}

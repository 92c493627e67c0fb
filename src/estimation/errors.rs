//! Errors for Bayesian phase estimation (grid, measurement and rate-model
//! validation, prior checks, and degenerate posteriors).
//!
//! This module defines the error type [`QPEError`] shared by the grid,
//! likelihood, posterior, circular-statistics, bootstrap, and k-sampling
//! routines. It implements `Display`/`Error` and converts to `PyErr` when the
//! `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to positions in the caller's arrays
//!   (grid points, prior weights, or measurement columns).
//! - Repetition counts `k` are strictly positive integers.
//! - Rates returned by error/discard models must be finite and lie in
//!   `[0, 1]`; the k-sampling policy additionally requires `rate < 1`.
//! - Numeric underflow is never an error: likelihoods are clamped to the
//!   configured tolerance instead.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for estimation operations that may produce
/// [`QPEError`].
pub type QPEResult<T> = Result<T, QPEError>;

/// Unified error type for grid-based phase estimation.
///
/// Covers grid construction, measurement and rate-model validation, prior
/// checks, estimator configuration, degenerate distributions, and sampling
/// failures.
#[derive(Debug, Clone, PartialEq)]
pub enum QPEError {
    // ---- Grid ----
    /// Grid has fewer than two points.
    GridTooSmall { len: usize },

    /// A grid point is NaN/±inf.
    NonFiniteGridPoint { index: usize, value: f64 },

    /// Grid points are not equally spaced and increasing.
    NonUniformGrid { index: usize, spacing: f64, expected: f64 },

    // ---- Measurements ----
    /// Repetition count must be >= 1.
    InvalidK { k: u32 },

    /// Rotation offset beta must be finite.
    InvalidBeta { index: usize, value: f64 },

    /// Measurement outcome bit must be 0 or 1.
    InvalidOutcome { value: u8 },

    /// Column lengths (ks, betas, ms, counts) disagree.
    LengthMismatch { what: &'static str, expected: usize, actual: usize },

    /// Operation needs at least one measurement.
    EmptyMeasurements,

    // ---- Rate models ----
    /// Error/discard rate outside [0, 1] or non-finite.
    RateOutOfRange { k: u32, rate: f64 },

    /// Rate of exactly 1 makes the k-sampling weight unbounded.
    UnboundedKWeight { k: u32, rate: f64 },

    /// Depolarizing parameter must lie in [0, 1].
    InvalidLambda { value: f64 },

    // ---- Prior / distribution ----
    /// Prior weight is negative or non-finite.
    InvalidPrior { index: usize, value: f64, reason: &'static str },

    /// Prior carries no mass (all weights zero).
    EmptyPrior,

    /// Pre-normalization integral is non-finite or (near) zero.
    DegenerateDistribution { integral: f64 },

    // ---- Options ----
    /// Log-domain floor must be finite and in (0, 1).
    InvalidTolerance { value: f64, reason: &'static str },

    /// Rounding precision exceeds f64 resolution.
    InvalidPrecision { digits: u32 },

    /// Number of bootstrap resamples must be >= 1.
    InvalidResampleCount { n_resamples: usize },

    /// Upper bound of the k candidate set must be >= 1.
    InvalidKMax { k_max: u32 },

    // ---- Mock source ----
    /// Eigenphase mixture is empty, mismatched, or has no positive weight.
    InvalidMixture { reason: &'static str },

    // ---- Sampling ----
    /// Weighted sampler could not be built.
    SamplingFailed { reason: String },
}

impl std::error::Error for QPEError {}

impl std::fmt::Display for QPEError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Grid ----
            QPEError::GridTooSmall { len } => {
                write!(f, "Phase grid needs at least 2 points; got {len}.")
            }
            QPEError::NonFiniteGridPoint { index, value } => {
                write!(f, "Grid point at index {index} is non-finite: {value}")
            }
            QPEError::NonUniformGrid { index, spacing, expected } => {
                write!(
                    f,
                    "Grid must be increasing and equally spaced: step at index {index} is {spacing}, expected {expected}"
                )
            }
            // ---- Measurements ----
            QPEError::InvalidK { k } => {
                write!(f, "Repetition count k must be >= 1; got {k}.")
            }
            QPEError::InvalidBeta { index, value } => {
                write!(f, "Beta at index {index} must be finite; got {value}")
            }
            QPEError::InvalidOutcome { value } => {
                write!(f, "Measurement outcome must be 0 or 1; got {value}.")
            }
            QPEError::LengthMismatch { what, expected, actual } => {
                write!(f, "Length mismatch for {what}: expected {expected}, got {actual}")
            }
            QPEError::EmptyMeasurements => {
                write!(f, "Measurement set is empty.")
            }
            // ---- Rate models ----
            QPEError::RateOutOfRange { k, rate } => {
                write!(f, "Rate at k = {k} must be finite and in [0, 1]; got {rate}")
            }
            QPEError::UnboundedKWeight { k, rate } => {
                write!(f, "Rate at k = {k} is {rate}; sampling weight 1/(1 - rate) is unbounded")
            }
            QPEError::InvalidLambda { value } => {
                write!(f, "Depolarizing parameter must be finite and in [0, 1]; got {value}")
            }
            // ---- Prior / distribution ----
            QPEError::InvalidPrior { index, value, reason } => {
                write!(f, "Prior weight at index {index} is invalid ({value}): {reason}")
            }
            QPEError::EmptyPrior => {
                write!(f, "Prior has zero total mass.")
            }
            QPEError::DegenerateDistribution { integral } => {
                write!(f, "Distribution cannot be normalized: integral is {integral}")
            }
            // ---- Options ----
            QPEError::InvalidTolerance { value, reason } => {
                write!(f, "Invalid tolerance {value}: {reason}")
            }
            QPEError::InvalidPrecision { digits } => {
                write!(f, "Rounding precision must be at most 17 digits; got {digits}.")
            }
            QPEError::InvalidResampleCount { n_resamples } => {
                write!(f, "Number of bootstrap resamples must be >= 1; got {n_resamples}.")
            }
            QPEError::InvalidKMax { k_max } => {
                write!(f, "k_max must be >= 1; got {k_max}.")
            }
            // ---- Mock source ----
            QPEError::InvalidMixture { reason } => {
                write!(f, "Invalid eigenphase mixture: {reason}")
            }
            // ---- Sampling ----
            QPEError::SamplingFailed { reason } => {
                write!(f, "Weighted sampling failed: {reason}")
            }
        }
    }
}

/// Convert a [`QPEError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<QPEError> for PyErr {
    fn from(err: QPEError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

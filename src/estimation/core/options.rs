//! Configuration for the posterior updater and the bootstrap estimator.
//!
//! Purpose
//! -------
//! Turn the numeric constants of grid-based estimation (log-domain floor,
//! output rounding, log-array initialization) and the bootstrap settings into
//! explicit, validated configuration values injected at construction.
//!
//! Key behaviors
//! -------------
//! - [`EstimatorOptions`] carries the likelihood floor `atol`, optional
//!   rounding `precision`, and the [`LogInit`] policy.
//! - [`BootstrapOptions`] carries the number of resamples and the base seed
//!   from which per-trial generators are derived.
//! - Both provide a `Default` matching the reference experiment settings.
//!
//! Invariants & assumptions
//! ------------------------
//! - `0 < atol < 1` and finite, so `ln(atol)` is finite and negative.
//! - `precision <= 17` decimal digits (beyond that f64 rounding is a no-op).
//! - `n_resamples >= 1`.
//!
//! Conventions
//! -----------
//! - Options describe intent only; they hold no buffers and are cheap to copy.
//!
//! Testing notes
//! -------------
//! - Unit tests cover defaults and every validation branch.
use crate::estimation::errors::{QPEError, QPEResult};

/// Default log-domain floor for likelihoods and prior weights.
pub const DEFAULT_ATOL: f64 = 1e-15;

/// Default number of decimal digits kept in normalized posteriors.
pub const DEFAULT_PRECISION: u32 = 15;

/// Default number of bootstrap resamples.
pub const DEFAULT_N_RESAMPLES: usize = 1000;

/// Largest rounding precision that still changes an f64.
const MAX_PRECISION: u32 = 17;

/// LogInit — how the running log-posterior is initialized.
///
/// Variants
/// --------
/// - `Prior`
///   Start from `ln(max(prior, atol))`. The prior genuinely biases the result.
/// - `Zero`
///   Start from zeros and ignore the prior values (shape is still checked).
///   Kept as a compatibility mode for analyses that always used a flat prior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogInit {
    #[default]
    Prior,
    Zero,
}

/// EstimatorOptions — numeric configuration of the posterior updater.
///
/// Fields
/// ------
/// - `atol`: `f64`
///   Floor applied to likelihoods (and prior weights) before taking logs.
/// - `precision`: `Option<u32>`
///   Decimal digits kept when rounding a normalized posterior; `None`
///   disables rounding.
/// - `log_init`: [`LogInit`]
///   Initialization policy for the running log-array.
///
/// Notes
/// -----
/// - The default is `atol = 1e-15`, `precision = Some(15)`,
///   `log_init = LogInit::Prior`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorOptions {
    pub atol: f64,
    pub precision: Option<u32>,
    pub log_init: LogInit,
}

impl EstimatorOptions {
    /// Construct validated estimator options.
    ///
    /// Errors
    /// ------
    /// - `QPEError::InvalidTolerance` when `atol` is non-finite or outside
    ///   `(0, 1)`.
    /// - `QPEError::InvalidPrecision` when `precision > 17`.
    pub fn new(atol: f64, precision: Option<u32>, log_init: LogInit) -> QPEResult<Self> {
        if !atol.is_finite() {
            return Err(QPEError::InvalidTolerance {
                value: atol,
                reason: "Tolerance must be finite.",
            });
        }
        if atol <= 0.0 || atol >= 1.0 {
            return Err(QPEError::InvalidTolerance {
                value: atol,
                reason: "Tolerance must lie strictly between 0 and 1.",
            });
        }
        if let Some(digits) = precision {
            if digits > MAX_PRECISION {
                return Err(QPEError::InvalidPrecision { digits });
            }
        }
        Ok(EstimatorOptions { atol, precision, log_init })
    }

    /// `ln(atol)`, the smallest value any log-domain entry can take per term.
    pub fn log_floor(&self) -> f64 {
        self.atol.ln()
    }
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        EstimatorOptions {
            atol: DEFAULT_ATOL,
            precision: Some(DEFAULT_PRECISION),
            log_init: LogInit::Prior,
        }
    }
}

/// BootstrapOptions — resampling configuration.
///
/// Fields
/// ------
/// - `n_resamples`: `usize`
///   Number of bootstrap trials `b` (`>= 1`).
/// - `seed`: `u64`
///   Base seed; trial `i` uses a generator seeded from `(seed, i)` so the
///   result does not depend on how trials are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOptions {
    pub n_resamples: usize,
    pub seed: u64,
}

impl BootstrapOptions {
    /// Errors
    /// ------
    /// - `QPEError::InvalidResampleCount` when `n_resamples == 0`.
    pub fn new(n_resamples: usize, seed: u64) -> QPEResult<Self> {
        if n_resamples == 0 {
            return Err(QPEError::InvalidResampleCount { n_resamples });
        }
        Ok(BootstrapOptions { n_resamples, seed })
    }
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        BootstrapOptions { n_resamples: DEFAULT_N_RESAMPLES, seed: 42 }
    }
}

//! Posterior updater — accumulate measurement log-likelihoods on a phase grid.
//!
//! Purpose
//! -------
//! Turn a prior over the phase grid and a sequence of single-shot
//! measurements into a log-posterior and a normalized posterior density.
//!
//! Key behaviors
//! -------------
//! - [`PosteriorUpdater::update_log`] initializes the running log-array from
//!   the prior (or from zeros under [`LogInit::Zero`]) and adds
//!   `ln(max(L, atol))` for every retained measurement. Discarded shots are
//!   skipped.
//! - [`PosteriorUpdater::update`] stabilizes by the running maximum,
//!   exponentiates, and divides by `Σ values · dphi`, optionally rounding to
//!   the configured precision.
//! - [`map_estimate`] returns the grid point of maximal weight.
//!
//! Invariants & assumptions
//! ------------------------
//! - No log-domain entry is ever `-inf`. Likelihoods are floored at `atol`
//!   before taking logs; prior weights are floored at `f64::MIN_POSITIVE`,
//!   so a zero-prior point stays excluded whatever the data say.
//! - A normalized posterior integrates to one over the grid,
//!   `Σ dᵢ · dphi = 1`, up to rounding.
//! - Measurement order does not change the result (the update is a sum).
//!
//! Conventions
//! -----------
//! - The error-rate model is optional; `None` means ideal measurements.
//! - Fully uninformative data (every likelihood equal) degrade to the
//!   normalized prior; this is reported at `warn` level, not as an error.
//!
//! Downstream usage
//! ----------------
//! - Feed the normalized posterior to
//!   [`get_mu_and_sigma`](crate::estimation::circular::get_mu_and_sigma).
//! - The bootstrap estimator reruns [`PosteriorUpdater::update`] once per
//!   resample with a flat prior.
//!
//! Testing notes
//! -------------
//! - Unit tests cover normalization, prior recovery at full error rate,
//!   order invariance, discarded-shot handling, shrinking dispersion, MAP
//!   convergence with grid resolution, and the compatibility init mode.
use crate::estimation::{
    core::{
        grid::PhaseGrid,
        likelihood::likelihood_on_grid,
        measurement::MeasurementSet,
        options::{EstimatorOptions, LogInit},
        rates::RateFn,
        validation::{validate_distribution, validate_prior},
    },
    errors::{QPEError, QPEResult},
};
use ndarray::{Array1, ArrayView1, Zip};

/// Log-range below which a posterior is considered flat.
const FLAT_LOG_RANGE: f64 = 1e-12;

/// PosteriorUpdater — grid-based Bayesian update with injected numerics.
///
/// Fields
/// ------
/// - `opts`: [`EstimatorOptions`]
///   Log-domain floor, output rounding, and log-array initialization.
///
/// Notes
/// -----
/// - Stateless apart from its options; one instance may be shared across
///   threads and reused for any number of updates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PosteriorUpdater {
    opts: EstimatorOptions,
}

impl PosteriorUpdater {
    pub fn new(opts: EstimatorOptions) -> Self {
        PosteriorUpdater { opts }
    }

    pub fn options(&self) -> &EstimatorOptions {
        &self.opts
    }

    /// Accumulate the unnormalized log-posterior.
    ///
    /// Parameters
    /// ----------
    /// - `grid`: `&PhaseGrid`
    ///   Phase grid the prior is defined on.
    /// - `prior`: `ArrayView1<f64>`
    ///   Non-negative prior weights, same length as `grid`. Need not be
    ///   normalized.
    /// - `measurements`: `&MeasurementSet`
    ///   Shots to incorporate; discarded ones contribute nothing.
    /// - `error_rate`: `Option<RateFn>`
    ///   Error-rate model `k → q`; `None` means `q = 0`.
    ///
    /// Returns
    /// -------
    /// `QPEResult<Array1<f64>>`
    ///   `ln(max(prior, f64::MIN_POSITIVE)) + Σ ln(max(L, atol))` per grid
    ///   point.
    ///
    /// Errors
    /// ------
    /// - Prior validation errors (`LengthMismatch`, `InvalidPrior`,
    ///   `EmptyPrior`). Under [`LogInit::Zero`] only the length is checked.
    /// - `QPEError::RateOutOfRange` when the model returns a rate outside
    ///   `[0, 1]`.
    /// - `QPEError::InvalidK` / `QPEError::InvalidBeta` from
    ///   [`likelihood_on_grid`].
    pub fn update_log(
        &self, grid: &PhaseGrid, prior: ArrayView1<'_, f64>, measurements: &MeasurementSet,
        error_rate: Option<RateFn<'_>>,
    ) -> QPEResult<Array1<f64>> {
        let atol = self.opts.atol;
        let mut log_post = match self.opts.log_init {
            LogInit::Prior => {
                validate_prior(grid, prior)?;
                prior.mapv(|p| p.max(f64::MIN_POSITIVE).ln())
            }
            LogInit::Zero => {
                if prior.len() != grid.len() {
                    return Err(QPEError::LengthMismatch {
                        what: "prior",
                        expected: grid.len(),
                        actual: prior.len(),
                    });
                }
                Array1::zeros(grid.len())
            }
        };

        let mut n_discarded = 0usize;
        for meas in measurements {
            let Some(m) = meas.outcome() else {
                n_discarded += 1;
                continue;
            };
            let lik = likelihood_on_grid(grid, meas.k(), meas.beta(), m, error_rate)?;
            Zip::from(&mut log_post).and(&lik).for_each(|lp, &l| *lp += l.max(atol).ln());
        }

        tracing::trace!(
            n_measurements = measurements.len(),
            n_discarded,
            grid_len = grid.len(),
            "accumulated log-posterior"
        );
        Ok(log_post)
    }

    /// Normalized posterior density over the grid.
    ///
    /// Same inputs and validation as [`update_log`](Self::update_log),
    /// followed by [`normalize_log`](Self::normalize_log).
    ///
    /// Errors
    /// ------
    /// - Everything [`update_log`](Self::update_log) returns.
    /// - `QPEError::DegenerateDistribution` when the integral is not finite
    ///   and positive.
    pub fn update(
        &self, grid: &PhaseGrid, prior: ArrayView1<'_, f64>, measurements: &MeasurementSet,
        error_rate: Option<RateFn<'_>>,
    ) -> QPEResult<Array1<f64>> {
        let log_post = self.update_log(grid, prior, measurements, error_rate)?;
        let posterior = self.normalize_log(grid, log_post.view())?;
        tracing::debug!(
            n_measurements = measurements.len(),
            n_retained = measurements.n_retained(),
            grid_len = grid.len(),
            "posterior updated"
        );
        Ok(posterior)
    }

    /// Exponentiate and normalize a log-density so that `Σ dᵢ · dphi = 1`.
    ///
    /// The running maximum is subtracted before exponentiating, so the largest
    /// entry maps to one and no overflow can occur.
    ///
    /// Errors
    /// ------
    /// - `QPEError::LengthMismatch` when the lengths disagree.
    /// - `QPEError::DegenerateDistribution` when the maximum or the integral
    ///   is not finite, or the integral is not positive.
    pub fn normalize_log(
        &self, grid: &PhaseGrid, log_post: ArrayView1<'_, f64>,
    ) -> QPEResult<Array1<f64>> {
        if log_post.len() != grid.len() {
            return Err(QPEError::LengthMismatch {
                what: "log_posterior",
                expected: grid.len(),
                actual: log_post.len(),
            });
        }
        let max = log_post.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        let min = log_post.fold(f64::INFINITY, |acc, &v| acc.min(v));
        if !max.is_finite() {
            return Err(QPEError::DegenerateDistribution { integral: max });
        }
        if max - min < FLAT_LOG_RANGE {
            tracing::warn!(
                grid_len = grid.len(),
                "posterior is flat; data carry no phase information"
            );
        }

        let mut posterior = log_post.mapv(|v| (v - max).exp());
        let integral = posterior.sum() * grid.dphi();
        if !integral.is_finite() || integral <= 0.0 {
            return Err(QPEError::DegenerateDistribution { integral });
        }
        posterior.mapv_inplace(|v| v / integral);

        if let Some(digits) = self.opts.precision {
            let scale = 10f64.powi(digits as i32);
            posterior.mapv_inplace(|v| (v * scale).round() / scale);
        }
        Ok(posterior)
    }
}

/// Log-posterior with default options.
///
/// Errors
/// ------
/// - See [`PosteriorUpdater::update_log`].
pub fn update_log(
    grid: &PhaseGrid, prior: ArrayView1<'_, f64>, measurements: &MeasurementSet,
    error_rate: Option<RateFn<'_>>,
) -> QPEResult<Array1<f64>> {
    PosteriorUpdater::default().update_log(grid, prior, measurements, error_rate)
}

/// Normalized posterior with default options.
///
/// Errors
/// ------
/// - See [`PosteriorUpdater::update`].
pub fn update(
    grid: &PhaseGrid, prior: ArrayView1<'_, f64>, measurements: &MeasurementSet,
    error_rate: Option<RateFn<'_>>,
) -> QPEResult<Array1<f64>> {
    PosteriorUpdater::default().update(grid, prior, measurements, error_rate)
}

/// MAP estimate: the grid point of largest weight.
///
/// Ties resolve to the lowest index.
///
/// Errors
/// ------
/// - `QPEError::LengthMismatch` / `QPEError::InvalidPrior` from
///   distribution validation.
pub fn map_estimate(grid: &PhaseGrid, dist: ArrayView1<'_, f64>) -> QPEResult<f64> {
    validate_distribution(grid, dist)?;
    let (best, _) = dist.iter().enumerate().fold((0usize, f64::NEG_INFINITY), |(bi, bv), (i, &v)| {
        if v > bv { (i, v) } else { (bi, bv) }
    });
    Ok(grid.points()[best])
}

//! Bootstrap estimator — sampling variability of the MAP phase estimate.
//!
//! Purpose
//! -------
//! Quantify how much the grid MAP estimate moves under resampling of the
//! observed shots, giving a frequentist spread of the estimator itself
//! (distinct from the width of a single posterior).
//!
//! Key behaviors
//! -------------
//! - Each trial draws `len(measurements)` indices uniformly with replacement,
//!   reruns the posterior update with a flat prior, and records the MAP grid
//!   point.
//! - The trial estimates are summarized as unit point masses with the
//!   circular mean / Holevo spread of
//!   [`point_mu_and_sigma`](crate::estimation::circular::point_mu_and_sigma).
//! - [`bootstrap_sampling`] takes an injected generator and runs trials in
//!   order. [`BootstrapEstimator::run_seeded`] derives one generator per
//!   trial from `(seed, trial index)`, so trials are independent and, with
//!   the `parallel` feature, run on the rayon pool without changing the
//!   result.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n_resamples >= 1` and the measurement set is non-empty.
//! - Trial order never affects the aggregated estimate.
//!
//! Conventions
//! -----------
//! - Cost is `O(b × |measurements| × |grid|)`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover input validation, reproducibility of the seeded run,
//!   and collapse of the spread for unanimous data. The `1/√n` shrinkage is
//!   checked in `tests/`.
use crate::estimation::{
    circular::{EstimationResult, point_mu_and_sigma},
    core::{
        grid::PhaseGrid,
        measurement::MeasurementSet,
        options::{BootstrapOptions, DEFAULT_N_RESAMPLES},
        rates::RateFn,
    },
    errors::{QPEError, QPEResult},
    posterior::{PosteriorUpdater, map_estimate},
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// BootstrapOutcome — aggregated estimate plus the per-trial MAP points.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapOutcome {
    pub estimate: EstimationResult,
    pub point_estimates: Vec<f64>,
}

/// BootstrapEstimator — resampling driver around a [`PosteriorUpdater`].
///
/// Fields
/// ------
/// - `updater`: [`PosteriorUpdater`]
///   Updater (and its numeric options) used for every trial.
/// - `opts`: [`BootstrapOptions`]
///   Number of resamples and base seed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BootstrapEstimator {
    updater: PosteriorUpdater,
    opts: BootstrapOptions,
}

impl BootstrapEstimator {
    pub fn new(updater: PosteriorUpdater, opts: BootstrapOptions) -> Self {
        BootstrapEstimator { updater, opts }
    }

    pub fn options(&self) -> &BootstrapOptions {
        &self.opts
    }

    /// Run all trials sequentially with an injected generator.
    ///
    /// Errors
    /// ------
    /// - `QPEError::EmptyMeasurements` for an empty measurement set.
    /// - `QPEError::InvalidResampleCount` when `n_resamples == 0`.
    /// - Any error of the posterior update (e.g. `RateOutOfRange`).
    pub fn run<R: Rng + ?Sized>(
        &self, grid: &PhaseGrid, measurements: &MeasurementSet, error_rate: Option<RateFn<'_>>,
        rng: &mut R,
    ) -> QPEResult<BootstrapOutcome> {
        self.check_inputs(measurements)?;
        let mut points = Vec::with_capacity(self.opts.n_resamples);
        for _ in 0..self.opts.n_resamples {
            points.push(self.trial(grid, measurements, error_rate, rng)?);
        }
        self.summarize(points)
    }

    /// Run all trials with per-trial generators derived from the base seed.
    ///
    /// Trial `i` uses `Xoshiro256PlusPlus::seed_from_u64(trial_seed(seed, i))`,
    /// so the outcome is identical whether trials run sequentially or on the
    /// rayon pool (`parallel` feature).
    ///
    /// Errors
    /// ------
    /// - Same as [`run`](Self::run).
    pub fn run_seeded(
        &self, grid: &PhaseGrid, measurements: &MeasurementSet, error_rate: Option<RateFn<'_>>,
    ) -> QPEResult<BootstrapOutcome> {
        self.check_inputs(measurements)?;
        let seed = self.opts.seed;
        let one_trial = |i: usize| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(trial_seed(seed, i as u64));
            self.trial(grid, measurements, error_rate, &mut rng)
        };

        #[cfg(feature = "parallel")]
        let points: QPEResult<Vec<f64>> =
            (0..self.opts.n_resamples).into_par_iter().map(one_trial).collect();

        #[cfg(not(feature = "parallel"))]
        let points: QPEResult<Vec<f64>> = (0..self.opts.n_resamples).map(one_trial).collect();

        self.summarize(points?)
    }

    fn check_inputs(&self, measurements: &MeasurementSet) -> QPEResult<()> {
        if measurements.is_empty() {
            return Err(QPEError::EmptyMeasurements);
        }
        if self.opts.n_resamples == 0 {
            return Err(QPEError::InvalidResampleCount { n_resamples: 0 });
        }
        Ok(())
    }

    fn trial<R: Rng + ?Sized>(
        &self, grid: &PhaseGrid, measurements: &MeasurementSet, error_rate: Option<RateFn<'_>>,
        rng: &mut R,
    ) -> QPEResult<f64> {
        let n = measurements.len();
        let indices: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
        let resampled = measurements.resample(&indices);
        let posterior =
            self.updater.update(grid, grid.uniform_prior().view(), &resampled, error_rate)?;
        map_estimate(grid, posterior.view())
    }

    fn summarize(&self, points: Vec<f64>) -> QPEResult<BootstrapOutcome> {
        let estimate = point_mu_and_sigma(&points)?;
        tracing::debug!(
            n_resamples = points.len(),
            mu = estimate.mu,
            sigma = estimate.sigma,
            "bootstrap finished"
        );
        Ok(BootstrapOutcome { estimate, point_estimates: points })
    }
}

/// Bootstrap circular mean and spread of the MAP estimator.
///
/// Parameters
/// ----------
/// - `grid`: `&PhaseGrid`
/// - `measurements`: `&MeasurementSet`
///   Observed shots; must be non-empty.
/// - `error_rate`: `Option<RateFn>`
/// - `n_resamples`: `Option<usize>`
///   Number of trials `b`; defaults to 1000.
/// - `rng`: `&mut R`
///   Source of the resampling indices.
///
/// Errors
/// ------
/// - `QPEError::EmptyMeasurements`, `QPEError::InvalidResampleCount`, and
///   posterior update errors.
pub fn bootstrap_sampling<R: Rng + ?Sized>(
    grid: &PhaseGrid, measurements: &MeasurementSet, error_rate: Option<RateFn<'_>>,
    n_resamples: Option<usize>, rng: &mut R,
) -> QPEResult<EstimationResult> {
    let opts = BootstrapOptions::new(n_resamples.unwrap_or(DEFAULT_N_RESAMPLES), 0)?;
    let estimator = BootstrapEstimator::new(PosteriorUpdater::default(), opts);
    Ok(estimator.run(grid, measurements, error_rate, rng)?.estimate)
}

/// SplitMix64 finalizer over `seed` and the trial counter.
///
/// Neighbouring counters yield decorrelated seeds for the trial generators.
pub fn trial_seed(seed: u64, counter: u64) -> u64 {
    let mut z = seed ^ counter.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

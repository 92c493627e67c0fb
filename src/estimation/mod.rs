//! estimation — grid-based Bayesian phase estimation from single-bit shots.
//!
//! Purpose
//! -------
//! Estimate an unknown periodic phase from noisy single-bit measurements of
//! an iterative QPE experiment. A prior over a discretized phase grid is
//! updated with a noise-aware likelihood, summarized with circular
//! statistics, and its sampling variability is quantified by bootstrap
//! resampling. A weighted k-sampling policy designs the measurement schedule.
//!
//! Key behaviors
//! -------------
//! - [`core`]: phase grid, measurement records, rate models, the single-shot
//!   likelihood, estimator options, and validation.
//! - [`posterior`]: [`PosteriorUpdater`] with `update_log` / `update` and the
//!   MAP estimate.
//! - [`circular`]: circular mean and Holevo spread ([`get_mu_and_sigma`]),
//!   plus a direct-moment diagnostic.
//! - [`bootstrap`]: resampling estimator of the MAP's variability.
//! - [`sampling`]: weighted design of repetition counts ([`generate_ks`]).
//! - [`simulate`]: mock shot source for tests and studies.
//! - [`errors`]: the shared [`QPEError`] / [`QPEResult`] types.
//!
//! Invariants & assumptions
//! ------------------------
//! - Phases are in half turns on a period of 2.
//! - Log-domain values are floored at the configured tolerance; a normalized
//!   posterior integrates to one over the grid.
//! - All randomness is injected, either as a generator or as a seed.
//!
//! Conventions
//! -----------
//! - Every fallible routine returns [`QPEResult`]; no routine panics on
//!   invalid inputs.
//! - Library code emits `tracing` events only; installing a subscriber is the
//!   caller's job.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. Build a [`PhaseGrid`] and a [`MeasurementSet`] (columns, shot
//!      histograms, or [`MockBackend::simulate`]).
//!   2. Call [`PosteriorUpdater::update`] with a prior and optional error
//!      model.
//!   3. Summarize with [`get_mu_and_sigma`]; estimate variability with
//!      [`bootstrap_sampling`] or [`BootstrapEstimator::run_seeded`].
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; end-to-end pipelines are
//!   covered in `tests/`.

pub mod bootstrap;
pub mod circular;
pub mod core;
pub mod errors;
pub mod posterior;
pub mod sampling;
pub mod simulate;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bootstrap::{BootstrapEstimator, BootstrapOutcome, bootstrap_sampling};
pub use self::circular::{
    EstimationResult, direct_mu_and_sigma, get_mu_and_sigma, point_mu_and_sigma,
};
pub use self::core::{
    BootstrapOptions, DepolarizingRate, EstimatorOptions, LogInit, Measurement, MeasurementSet,
    Outcome, PhaseGrid, RateFn, ShotCounts, binary_fraction, noise_aware_likelihood,
    noise_aware_likelihood_grid,
};
pub use self::errors::{QPEError, QPEResult};
pub use self::posterior::{PosteriorUpdater, map_estimate, update, update_log};
pub use self::sampling::{generate_ks, k_weights};
pub use self::simulate::{MockBackend, ShiftFn};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_qpe::estimation::prelude::*;
//
// to import the everyday estimation surface in a single line.

pub mod prelude {
    pub use super::{
        BootstrapEstimator, BootstrapOptions, DepolarizingRate, EstimationResult,
        EstimatorOptions, LogInit, Measurement, MeasurementSet, MockBackend, Outcome, PhaseGrid,
        PosteriorUpdater, QPEError, QPEResult, RateFn, bootstrap_sampling, generate_ks,
        get_mu_and_sigma, map_estimate,
    };
}

//! core — phase grid, measurements, noise model, and estimator configuration.
//!
//! Purpose
//! -------
//! Collect the building blocks shared by every grid-based estimation routine:
//! the discretized phase domain, measurement records, error/discard rate
//! models, the noise-aware single-shot likelihood, estimator options, and
//! input validation.
//!
//! Key behaviors
//! -------------
//! - [`PhaseGrid`] holds `N` equally spaced points over one period of length
//!   2 together with the resolution `dphi`.
//! - [`Measurement`] / [`MeasurementSet`] carry `(k, β, m)` triples, with
//!   `m = None` for discarded shots.
//! - [`RateFn`] and [`DepolarizingRate`] model `k → rate` maps.
//! - [`noise_aware_likelihood`] and its grid form evaluate
//!   `½(1 + (1 − q)(−1)^m cos(π(kφ + β)))`.
//! - [`EstimatorOptions`] / [`BootstrapOptions`] replace module-level numeric
//!   constants with injected configuration.
//!
//! Invariants & assumptions
//! ------------------------
//! - All phases are in half turns and identified modulo 2.
//! - Constructors validate their inputs and return [`QPEResult`]; raw numeric
//!   kernels (the likelihood functions) do not.
//!
//! Downstream usage
//! ----------------
//! - The posterior, circular-statistics, bootstrap, sampling, and simulation
//!   modules depend on the types re-exported here.
//!
//! Testing notes
//! -------------
//! - Every submodule carries its own unit tests; cross-module behavior is
//!   tested in the posterior and bootstrap modules and in `tests/`.
//!
//! [`QPEResult`]: crate::estimation::errors::QPEResult

pub mod grid;
pub mod likelihood;
pub mod measurement;
pub mod options;
pub mod rates;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::grid::PhaseGrid;
pub use self::likelihood::{
    likelihood_on_grid, noise_aware_likelihood, noise_aware_likelihood_grid,
};
pub use self::measurement::{
    Measurement, MeasurementSet, Outcome, ShotCounts, binary_fraction,
};
pub use self::options::{
    BootstrapOptions, DEFAULT_ATOL, DEFAULT_N_RESAMPLES, DEFAULT_PRECISION, EstimatorOptions,
    LogInit,
};
pub use self::rates::{DepolarizingRate, RateFn, eval_rate};
pub use self::validation::{validate_distribution, validate_k_max, validate_prior};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::grid::PhaseGrid;
    pub use super::likelihood::noise_aware_likelihood;
    pub use super::measurement::{Measurement, MeasurementSet, Outcome};
    pub use super::options::{BootstrapOptions, EstimatorOptions, LogInit};
    pub use super::rates::{DepolarizingRate, RateFn};
}

//! rust_qpe — grid-based Bayesian phase estimation with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the estimator to Python through the `_rust_qpe` extension module.
//!
//! Key behaviors
//! -------------
//! - [`estimation`]: phase grid, noise-aware likelihood, posterior updates,
//!   circular statistics, bootstrap, k-sampling, and a mock shot source.
//! - [`calibration`]: maximum-likelihood fit of the depolarizing error rate
//!   that feeds the likelihood.
//! - [`optimization`]: the argmin-backed L-BFGS layer used by calibration.
//! - With `python-bindings`, `_rust_qpe.estimation` and
//!   `_rust_qpe.calibration` expose the main routines as functions.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file only converts
//!   arguments, runs the routine, and maps errors to `PyErr`.
//! - Error-rate models cross the Python boundary as an optional depolarizing
//!   `lambda_d`, never as Python callables.
//!
//! Conventions
//! -----------
//! - Phases are in half turns on a period of 2, matching
//!   [`estimation::core::grid::PhaseGrid`].
//! - Randomized Python entry points take an optional integer seed.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   the integration tests in `tests/`.

pub mod calibration;
pub mod estimation;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use rand::SeedableRng;

#[cfg(feature = "python-bindings")]
use rand_xoshiro::Xoshiro256PlusPlus;

#[cfg(feature = "python-bindings")]
use crate::{
    calibration::depolarizing::{CalibrationData, CalibrationOptions, fit_depolarizing},
    estimation::{
        bootstrap::BootstrapEstimator,
        circular,
        core::options::{BootstrapOptions, DEFAULT_N_RESAMPLES},
        posterior::PosteriorUpdater,
        sampling,
    },
    optimization::loglik_optimizer::MLEOptions,
    utils::{extract_f64_vec, extract_grid, extract_measurements, with_rate},
};

/// Normalized posterior over the grid.
///
/// Parameters
/// ----------
/// - `phi`: grid points (uniformly spaced, half turns).
/// - `prior`: non-negative prior weights, one per grid point.
/// - `ks`, `betas`, `ms`: measurement columns; `None` in `ms` is a discard.
/// - `lambda_d`: optional depolarizing parameter of the error model.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (phi, prior, ks, betas, ms, lambda_d=None))]
fn update<'py>(
    py: Python<'py>, phi: &Bound<'py, PyAny>, prior: &Bound<'py, PyAny>, ks: Vec<u32>,
    betas: &Bound<'py, PyAny>, ms: Vec<Option<u8>>, lambda_d: Option<f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let grid = extract_grid(py, phi)?;
    let prior = extract_f64_vec(py, prior)?;
    let shots = extract_measurements(py, ks, betas, ms)?;
    let updater = PosteriorUpdater::default();
    let posterior = with_rate(lambda_d, |rate| updater.update(&grid, prior.view(), &shots, rate))?;
    Ok(posterior.into_pyarray(py))
}

/// Unnormalized log-posterior; same arguments as `update`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (phi, prior, ks, betas, ms, lambda_d=None))]
fn update_log<'py>(
    py: Python<'py>, phi: &Bound<'py, PyAny>, prior: &Bound<'py, PyAny>, ks: Vec<u32>,
    betas: &Bound<'py, PyAny>, ms: Vec<Option<u8>>, lambda_d: Option<f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let grid = extract_grid(py, phi)?;
    let prior = extract_f64_vec(py, prior)?;
    let shots = extract_measurements(py, ks, betas, ms)?;
    let updater = PosteriorUpdater::default();
    let log_post =
        with_rate(lambda_d, |rate| updater.update_log(&grid, prior.view(), &shots, rate))?;
    Ok(log_post.into_pyarray(py))
}

/// Circular mean and Holevo spread `(mu, sigma)` of a grid distribution.
#[cfg(feature = "python-bindings")]
#[pyfunction]
fn get_mu_and_sigma<'py>(
    py: Python<'py>, phi: &Bound<'py, PyAny>, distribution: &Bound<'py, PyAny>,
) -> PyResult<(f64, f64)> {
    let grid = extract_grid(py, phi)?;
    let dist = extract_f64_vec(py, distribution)?;
    let est = circular::get_mu_and_sigma(&grid, dist.view())?;
    Ok((est.mu, est.sigma))
}

/// Bootstrap `(mu, sigma)` of the MAP estimator over `b` resamples.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (phi, ks, betas, ms, lambda_d=None, b=DEFAULT_N_RESAMPLES, seed=42))]
fn bootstrap_sampling<'py>(
    py: Python<'py>, phi: &Bound<'py, PyAny>, ks: Vec<u32>, betas: &Bound<'py, PyAny>,
    ms: Vec<Option<u8>>, lambda_d: Option<f64>, b: usize, seed: u64,
) -> PyResult<(f64, f64)> {
    let grid = extract_grid(py, phi)?;
    let shots = extract_measurements(py, ks, betas, ms)?;
    let opts = BootstrapOptions::new(b, seed)?;
    let estimator = BootstrapEstimator::new(PosteriorUpdater::default(), opts);
    let outcome = with_rate(lambda_d, |rate| estimator.run_seeded(&grid, &shots, rate))?;
    Ok((outcome.estimate.mu, outcome.estimate.sigma))
}

/// Draw `n_samples` repetition counts from `1..=k_max`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (k_max, n_samples, lambda_d=None, seed=None))]
fn generate_ks(
    k_max: u32, n_samples: usize, lambda_d: Option<f64>, seed: Option<u64>,
) -> PyResult<Vec<u32>> {
    let mut rng = match seed {
        Some(s) => Xoshiro256PlusPlus::seed_from_u64(s),
        None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
    };
    with_rate(lambda_d, |rate| sampling::generate_ks(k_max, n_samples, rate, None, &mut rng))
}

/// Fit the depolarizing parameter; returns `(lambda, std_err)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ks, p0s, n_shots, lambda_init=0.1))]
fn fit_error_rate(
    ks: Vec<u32>, p0s: Vec<f64>, n_shots: Vec<u64>, lambda_init: f64,
) -> PyResult<(f64, f64)> {
    let data = CalibrationData::new(ks, p0s, n_shots)?;
    let opts = CalibrationOptions::new(MLEOptions::default(), lambda_init)?;
    let fit = fit_depolarizing(&data, &opts)?;
    Ok((fit.lambda, fit.std_err))
}

/// `_rust_qpe` — module initializer.
///
/// Creates the `estimation` and `calibration` submodules, attaches them to
/// the parent, and registers them in `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_qpe<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let estimation_mod = PyModule::new(py, "estimation")?;
    estimation_mod.add_function(wrap_pyfunction!(update, &estimation_mod)?)?;
    estimation_mod.add_function(wrap_pyfunction!(update_log, &estimation_mod)?)?;
    estimation_mod.add_function(wrap_pyfunction!(get_mu_and_sigma, &estimation_mod)?)?;
    estimation_mod.add_function(wrap_pyfunction!(bootstrap_sampling, &estimation_mod)?)?;
    estimation_mod.add_function(wrap_pyfunction!(generate_ks, &estimation_mod)?)?;
    m.add_submodule(&estimation_mod)?;

    let calibration_mod = PyModule::new(py, "calibration")?;
    calibration_mod.add_function(wrap_pyfunction!(fit_error_rate, &calibration_mod)?)?;
    m.add_submodule(&calibration_mod)?;

    let modules = py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_qpe.estimation", estimation_mod)?;
    modules.set_item("rust_qpe.calibration", calibration_mod)?;
    Ok(())
}

//! Integration tests for the phase-estimation pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end flow: k-sampling design, simulated shots from a
//!   known eigenphase, noise-aware posterior update, and circular summary.
//! - Check the sampling behavior of the bootstrap estimator as the number of
//!   shots grows.
//! - Close the loop from error-rate calibration to a noise-aware estimate.
//!
//! Coverage
//! --------
//! - `estimation::{sampling, simulate, posterior, circular, bootstrap}`.
//! - `calibration::depolarizing` feeding `estimation::core::rates`.
//!
//! Exclusions
//! ----------
//! - Input validation and small analytic cases; those are unit tests.
//! - Python bindings.
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rust_qpe::{
    calibration::{CalibrationData, CalibrationOptions, fit_depolarizing},
    estimation::{prelude::*, update},
};

const PHI0: f64 = 0.3;

/// Signed circular distance `a − b` wrapped into `[-1, 1)`.
fn wrapped_diff(a: f64, b: f64) -> f64 {
    (a - b + 1.0).rem_euclid(2.0) - 1.0
}

/// Alternating β ∈ {0, 0.5}: cosine- and sine-type shots.
fn alternating_betas(n: usize) -> Vec<f64> {
    (0..n).map(|i| if i % 2 == 0 { 0.0 } else { 0.5 }).collect()
}

#[test]
// Purpose
// -------
// A noisy experiment designed with the k-sampling policy recovers the
// eigenphase within a few posterior standard deviations.
//
// Given
// -----
// - φ₀ = 0.3, depolarizing λ = 0.05, k drawn from 1..=8, alternating β,
//   400 shots, grid of 1024 points; the estimator uses the true error model.
//
// Expect
// ------
// - |μ − φ₀| < 5σ and < 0.03, with 0.002 < σ < 0.015.
fn designed_experiment_recovers_phase() {
    // Arrange
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
    let noise = DepolarizingRate::new(0.05).expect("valid lambda");
    let rate = noise.as_fn();
    let ks = generate_ks(8, 400, Some(&rate), None, &mut rng).expect("design");
    let betas = alternating_betas(ks.len());
    let backend = MockBackend::single(PHI0).expect("backend").with_error_rate(&rate);
    let shots = backend.simulate(&ks, &betas, &mut rng).expect("shots");
    let grid = PhaseGrid::new(1024).expect("grid");

    // Act
    let posterior = PosteriorUpdater::default()
        .update(&grid, grid.uniform_prior().view(), &shots, Some(&rate))
        .expect("posterior");
    let est = get_mu_and_sigma(&grid, posterior.view()).expect("summary");

    // Assert
    let err = wrapped_diff(est.mu, PHI0).abs();
    assert!(est.sigma > 0.002 && est.sigma < 0.015, "sigma = {}", est.sigma);
    assert!(err < 0.03, "mu = {}", est.mu);
    assert!(err < 5.0 * est.sigma, "error {err} vs sigma {}", est.sigma);
}

#[test]
// Purpose
// -------
// The bootstrap spread of the MAP estimate shrinks like 1/√n.
//
// Given
// -----
// - k = 1, alternating β, constant error rate 0.05, φ₀ = 0.3.
// - Shot counts n ∈ {25, 100, 400}; b = 200 seeded resamples; 512 points.
//
// Expect
// ------
// - σ(400) < σ(100) < σ(25).
// - σ(400)/σ(100) within (0.3, 0.8) around the 1/√n ratio of 0.5.
fn bootstrap_spread_shrinks_with_shots() {
    // Arrange
    let q = |_: u32| 0.05;
    let backend = MockBackend::single(PHI0).expect("backend").with_error_rate(&q);
    let grid = PhaseGrid::new(512).expect("grid");
    let estimator = BootstrapEstimator::new(
        PosteriorUpdater::default(),
        BootstrapOptions::new(200, 17).expect("options"),
    );
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
    let all = backend.simulate(&[1; 400], &alternating_betas(400), &mut rng).expect("shots");

    // Act
    let sigmas: Vec<f64> = [25, 100, 400]
        .iter()
        .map(|&n| {
            estimator
                .run_seeded(&grid, &all.truncated(n), Some(&q))
                .expect("bootstrap")
                .estimate
                .sigma
        })
        .collect();

    // Assert
    assert!(sigmas[2] < sigmas[1] && sigmas[1] < sigmas[0], "sigmas = {sigmas:?}");
    let ratio = sigmas[2] / sigmas[1];
    assert!(ratio > 0.3 && ratio < 0.8, "ratio = {ratio}");
}

#[test]
// Purpose
// -------
// Benchmark circuits calibrate λ, and the fitted model drives a noisy
// estimate.
//
// Given
// -----
// - Benchmark circuits (φ = 0, β = 0) with k ∈ {3, 6, 9, 12}, 2000 shots
//   each, generated with λ = 0.10806.
// - A 300-shot k ∈ 1..=4 experiment at φ₀ = 0.3 with the same noise.
//
// Expect
// ------
// - |λ̂ − λ| < 4·SE and the 95% interval is ordered around λ̂.
// - The estimate with the fitted model lies within 5σ of φ₀.
fn calibrated_model_feeds_estimation() {
    // Arrange
    let lambda = 0.10806;
    let truth = DepolarizingRate::new(lambda).expect("valid lambda");
    let noise = truth.as_fn();
    let bench = MockBackend::single(0.0).expect("backend").with_error_rate(&noise);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let ks = vec![3u32, 6, 9, 12];
    let n_shots = 2000u64;
    let p0s: Vec<f64> = ks
        .iter()
        .map(|&k| {
            let shots = bench
                .simulate(&vec![k; n_shots as usize], &vec![0.0; n_shots as usize], &mut rng)
                .expect("benchmark shots");
            let zeros = shots.iter().filter(|m| m.outcome() == Some(Outcome::Zero)).count();
            zeros as f64 / n_shots as f64
        })
        .collect();
    let data = CalibrationData::new(ks, p0s, vec![n_shots; 4]).expect("data");

    // Act
    let fit = fit_depolarizing(&data, &CalibrationOptions::default()).expect("fit");
    let (lo, hi) = fit.confidence_interval(0.95).expect("interval");
    let model = fit.rate_model().expect("rate model");
    let fitted = model.as_fn();

    let exp_ks: Vec<u32> = (0..300).map(|_| rng.random_range(1..=4)).collect();
    let backend = MockBackend::single(PHI0).expect("backend").with_error_rate(&noise);
    let shots = backend.simulate(&exp_ks, &alternating_betas(300), &mut rng).expect("shots");
    let grid = PhaseGrid::new(1024).expect("grid");
    let posterior = update(&grid, grid.uniform_prior().view(), &shots, Some(&fitted))
        .expect("posterior");
    let est = get_mu_and_sigma(&grid, posterior.view()).expect("summary");

    // Assert
    assert!(fit.converged);
    assert!((fit.lambda - lambda).abs() < 4.0 * fit.std_err, "fit = {fit:?}");
    assert!(lo < fit.lambda && fit.lambda < hi);
    assert!(wrapped_diff(est.mu, PHI0).abs() < 5.0 * est.sigma, "est = {est:?}");
}

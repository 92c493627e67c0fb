//! Depolarizing error-rate calibration from benchmark circuits.
//!
//! Purpose
//! -------
//! Fit the per-repetition depolarizing parameter `λ` of the error model
//! `q(k) = 1 − (1 − λ)^k` from benchmark circuits whose ideal outcome is 0.
//! A circuit with `k` repetitions returns 0 with probability
//! `y(k) = (1 + (1 − λ)^k) / 2`.
//!
//! Key behaviors
//! -------------
//! - The fit maximizes the binomial log-likelihood
//!   `ℓ(λ) = Σᵢ nᵢ [p̂ᵢ ln y(kᵢ) + (1 − p̂ᵢ) ln(1 − y(kᵢ))]` with L-BFGS in
//!   `θ = logit(λ)`, so the estimate always lies in `(0, 1)`.
//! - The standard error comes from the observed information in `θ` and is
//!   mapped back with the delta method, `SE(λ) = σ'(θ̂) · SE(θ̂)`.
//! - [`DepolarizingFit::rate_model`] hands the fitted `λ` to the estimator
//!   as a [`DepolarizingRate`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every circuit has `k ≥ 1`, at least one shot, and `p̂ ∈ [0, 1]`.
//! - `y(k)` is clamped away from 0 and 1 before taking logs.
use crate::{
    calibration::{
        errors::{CalibError, CalibResult},
        hessian::standard_errors,
    },
    estimation::core::rates::DepolarizingRate,
    optimization::{
        errors::OptResult,
        loglik_optimizer::{
            Grad, LogLikelihood, MLEOptions, Theta, maximize, validation::validate_theta,
        },
        numerical_stability::{LOGIT_EPS, logistic_derivative, safe_logistic, safe_logit},
    },
};
use ndarray::{Array1, array};
use statrs::distribution::{ContinuousCDF, Normal};

/// Starting `λ` for the fit.
pub const DEFAULT_LAMBDA_INIT: f64 = 0.1;

/// Probability of reading 0 after `k` repetitions under depolarizing rate
/// `lambda`.
pub fn depolarizing_p0(lambda: f64, k: u32) -> f64 {
    0.5 * (1.0 + (1.0 - lambda).powf(f64::from(k)))
}

/// CalibrationData — per-circuit benchmark results.
///
/// Fields
/// ------
/// - `ks`: repetition count of each circuit.
/// - `p0s`: observed fraction of 0 outcomes.
/// - `n_shots`: number of shots behind each fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationData {
    ks: Vec<u32>,
    p0s: Vec<f64>,
    n_shots: Vec<u64>,
}

impl CalibrationData {
    /// Errors
    /// ------
    /// - `CalibError::EmptyData`, `CalibError::LengthMismatch`.
    /// - `CalibError::InvalidK`, `CalibError::InvalidProbability`,
    ///   `CalibError::InvalidShotCount` for the first bad circuit.
    pub fn new(ks: Vec<u32>, p0s: Vec<f64>, n_shots: Vec<u64>) -> CalibResult<Self> {
        if ks.is_empty() {
            return Err(CalibError::EmptyData);
        }
        for (what, len) in [("p0s", p0s.len()), ("n_shots", n_shots.len())] {
            if len != ks.len() {
                return Err(CalibError::LengthMismatch { what, expected: ks.len(), actual: len });
            }
        }
        for (index, ((&k, &p0), &n)) in ks.iter().zip(&p0s).zip(&n_shots).enumerate() {
            if k == 0 {
                return Err(CalibError::InvalidK { index });
            }
            if !(0.0..=1.0).contains(&p0) {
                return Err(CalibError::InvalidProbability { index, value: p0 });
            }
            if n == 0 {
                return Err(CalibError::InvalidShotCount { index });
            }
        }
        Ok(CalibrationData { ks, p0s, n_shots })
    }

    pub fn len(&self) -> usize {
        self.ks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ks.is_empty()
    }

    pub fn ks(&self) -> &[u32] {
        &self.ks
    }

    pub fn p0s(&self) -> &[f64] {
        &self.p0s
    }

    pub fn n_shots(&self) -> &[u64] {
        &self.n_shots
    }

    /// `(k, zeros, ones)` per circuit, with counts as reals.
    fn counts(&self) -> impl Iterator<Item = (u32, f64, f64)> + '_ {
        self.ks.iter().zip(&self.p0s).zip(&self.n_shots).map(|((&k, &p0), &n)| {
            let n = n as f64;
            (k, p0 * n, (1.0 - p0) * n)
        })
    }
}

/// CalibrationOptions — optimizer settings and the starting `λ`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOptions {
    pub mle: MLEOptions,
    pub lambda_init: f64,
}

impl CalibrationOptions {
    /// Errors
    /// ------
    /// - `CalibError::InvalidInitialLambda` unless `0 < lambda_init < 1`.
    pub fn new(mle: MLEOptions, lambda_init: f64) -> CalibResult<Self> {
        if !(lambda_init > 0.0 && lambda_init < 1.0) {
            return Err(CalibError::InvalidInitialLambda { value: lambda_init });
        }
        Ok(CalibrationOptions { mle, lambda_init })
    }
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        CalibrationOptions { mle: MLEOptions::default(), lambda_init: DEFAULT_LAMBDA_INIT }
    }
}

/// Binomial log-likelihood of the depolarizing model in `θ = logit(λ)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepolarizingModel;

impl LogLikelihood for DepolarizingModel {
    type Data = CalibrationData;

    fn value(&self, theta: &Theta, data: &CalibrationData) -> OptResult<f64> {
        let lambda = safe_logistic(theta[0]);
        Ok(data
            .counts()
            .map(|(k, zeros, ones)| {
                let y = depolarizing_p0(lambda, k).clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
                zeros * y.ln() + ones * (-y).ln_1p()
            })
            .sum())
    }

    fn check(&self, theta: &Theta, _data: &CalibrationData) -> OptResult<()> {
        validate_theta(theta, 1)
    }

    fn grad(&self, theta: &Theta, data: &CalibrationData) -> OptResult<Grad> {
        let lambda = safe_logistic(theta[0]);
        let dl_dlambda: f64 = data
            .counts()
            .map(|(k, zeros, ones)| {
                let y = depolarizing_p0(lambda, k).clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
                let kf = f64::from(k);
                let dy = -0.5 * kf * (1.0 - lambda).powf(kf - 1.0);
                (zeros / y - ones / (1.0 - y)) * dy
            })
            .sum();
        Ok(array![dl_dlambda * logistic_derivative(theta[0])])
    }
}

/// DepolarizingFit — result of [`fit_depolarizing`].
///
/// Fields
/// ------
/// - `lambda`: fitted per-repetition depolarizing parameter.
/// - `std_err`: delta-method standard error of `lambda`.
/// - `log_likelihood`: `ℓ(λ̂)` without the binomial constant.
/// - `converged`: whether the optimizer reported termination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepolarizingFit {
    pub lambda: f64,
    pub std_err: f64,
    pub log_likelihood: f64,
    pub converged: bool,
}

impl DepolarizingFit {
    /// The fitted error-rate model, ready for the posterior updater.
    pub fn rate_model(&self) -> CalibResult<DepolarizingRate> {
        Ok(DepolarizingRate::new(self.lambda)?)
    }

    /// Two-sided normal confidence interval for `λ`, clipped to `[0, 1]`.
    ///
    /// Errors
    /// ------
    /// - `CalibError::InvalidConfidence` unless `0 < level < 1`.
    pub fn confidence_interval(&self, level: f64) -> CalibResult<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) {
            return Err(CalibError::InvalidConfidence { level });
        }
        let normal =
            Normal::new(0.0, 1.0).map_err(|_| CalibError::InvalidConfidence { level })?;
        let z = normal.inverse_cdf(0.5 * (1.0 + level));
        let half = z * self.std_err;
        Ok(((self.lambda - half).max(0.0), (self.lambda + half).min(1.0)))
    }
}

/// Fit `λ` by maximum likelihood.
///
/// Parameters
/// ----------
/// - `data`: `&CalibrationData`
/// - `opts`: `&CalibrationOptions`
///
/// Errors
/// ------
/// - `CalibError::Optimization` when L-BFGS or the standard-error Hessian
///   fails.
pub fn fit_depolarizing(
    data: &CalibrationData, opts: &CalibrationOptions,
) -> CalibResult<DepolarizingFit> {
    let model = DepolarizingModel;
    let outcome = maximize(&model, array![safe_logit(opts.lambda_init)], data, &opts.mle)?;
    let theta_hat = outcome.theta_hat;

    let neg_grad = |theta: &Theta| match model.grad(theta, data) {
        Ok(g) => -g,
        Err(_) => Array1::from_elem(theta.len(), f64::NAN),
    };
    let se_theta = standard_errors(&neg_grad, &theta_hat)?;

    let fit = DepolarizingFit {
        lambda: safe_logistic(theta_hat[0]),
        std_err: logistic_derivative(theta_hat[0]) * se_theta[0],
        log_likelihood: outcome.value,
        converged: outcome.converged,
    };
    tracing::debug!(
        lambda = fit.lambda,
        std_err = fit.std_err,
        iterations = outcome.iterations,
        converged = fit.converged,
        "depolarizing fit finished"
    );
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Benchmark-data validation.
    // - The analytic gradient against finite differences.
    // - Recovery of λ and its Fisher standard error from noiseless data.
    // - Confidence intervals and hand-off to the rate model.
    // -------------------------------------------------------------------------

    const LAMBDA: f64 = 0.10806;
    const KS: [u32; 4] = [3, 6, 9, 12];

    fn exact_data(n: u64) -> CalibrationData {
        CalibrationData::new(
            KS.to_vec(),
            KS.iter().map(|&k| depolarizing_p0(LAMBDA, k)).collect(),
            vec![n; KS.len()],
        )
        .expect("valid data")
    }

    #[test]
    // Purpose
    // -------
    // Malformed benchmark data are rejected with the first offender.
    fn invalid_data_are_rejected() {
        assert_eq!(CalibrationData::new(vec![], vec![], vec![]), Err(CalibError::EmptyData));
        assert!(matches!(
            CalibrationData::new(vec![1, 2], vec![0.9], vec![10, 10]),
            Err(CalibError::LengthMismatch { what: "p0s", .. })
        ));
        assert_eq!(
            CalibrationData::new(vec![1, 0], vec![0.9, 0.9], vec![10, 10]),
            Err(CalibError::InvalidK { index: 1 })
        );
        assert!(matches!(
            CalibrationData::new(vec![1], vec![1.2], vec![10]),
            Err(CalibError::InvalidProbability { index: 0, .. })
        ));
        assert_eq!(
            CalibrationData::new(vec![1], vec![0.9], vec![0]),
            Err(CalibError::InvalidShotCount { index: 0 })
        );
        assert!(matches!(
            CalibrationOptions::new(MLEOptions::default(), 1.0),
            Err(CalibError::InvalidInitialLambda { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient agrees with a central difference of `value`.
    //
    // Given
    // -----
    // - Noiseless data (n = 1000) evaluated at θ = logit(0.2).
    //
    // Expect
    // ------
    // - Relative agreement within 1e-5.
    fn gradient_matches_central_difference() {
        let data = exact_data(1000);
        let theta = array![safe_logit(0.2)];
        let h = 1e-6;
        let up = DepolarizingModel.value(&array![theta[0] + h], &data).expect("value");
        let down = DepolarizingModel.value(&array![theta[0] - h], &data).expect("value");
        let g = DepolarizingModel.grad(&theta, &data).expect("grad");
        assert_relative_eq!(g[0], (up - down) / (2.0 * h), max_relative = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Noiseless data recover λ and its Fisher standard error.
    //
    // Given
    // -----
    // - p̂(k) = y(k; 0.10806) for k ∈ {3, 6, 9, 12}, 1000 shots each.
    //
    // Expect
    // ------
    // - λ̂ ≈ 0.10806, SE ≈ 1/sqrt(I(λ)) ≈ 0.004296, converged.
    fn noiseless_data_recover_lambda() {
        // Arrange
        let data = exact_data(1000);

        // Act
        let fit = fit_depolarizing(&data, &CalibrationOptions::default()).expect("fit");

        // Assert
        assert!(fit.converged);
        assert_relative_eq!(fit.lambda, LAMBDA, epsilon = 1e-5);
        assert_relative_eq!(fit.std_err, 0.004296353675694528, max_relative = 1e-2);
        assert!(fit.log_likelihood < 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Intervals widen with the level and the fit feeds the rate model.
    fn interval_and_rate_model() {
        let fit =
            DepolarizingFit { lambda: 0.1, std_err: 0.01, log_likelihood: -1.0, converged: true };

        let (lo, hi) = fit.confidence_interval(0.95).expect("interval");
        assert_relative_eq!(hi - fit.lambda, 1.959964 * 0.01, epsilon = 1e-6);
        assert_relative_eq!(fit.lambda - lo, hi - fit.lambda, epsilon = 1e-12);
        let (lo90, _) = fit.confidence_interval(0.90).expect("interval");
        assert!(lo90 > lo);
        assert!(matches!(fit.confidence_interval(1.0), Err(CalibError::InvalidConfidence { .. })));

        let rate = fit.rate_model().expect("rate model");
        assert_relative_eq!(rate.rate(2), 1.0 - 0.9 * 0.9, epsilon = 1e-12);
    }
}

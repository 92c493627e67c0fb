//! Circular statistics on the periodic phase domain.
//!
//! Purpose
//! -------
//! Summarize a distribution over the phase grid (or a set of point
//! estimates) by a circular mean `μ` and a Holevo-variance based spread `σ`.
//!
//! Key behaviors
//! -------------
//! - [`get_mu_and_sigma`] computes the first trigonometric moment
//!   `Z = Σ dᵢ · e^{iπφᵢ} · dphi`, then `μ = arg(Z)/π` and
//!   `σ = sqrt(|Z|⁻² − 1)/π`.
//! - [`point_mu_and_sigma`] applies the same formula to unit point masses
//!   (`Z = mean(e^{iπφⱼ})`), as used by the bootstrap estimator.
//! - [`direct_mu_and_sigma`] is a non-circular diagnostic: ordinary moments,
//!   recomputed after shifting the lower half of the grid by +2, keeping the
//!   narrower of the two.
//!
//! Invariants & assumptions
//! ------------------------
//! - Phases are in half turns, identified modulo 2; `μ ∈ (-1, 1]`.
//! - A near-uniform distribution drives `|Z| → 0` and `σ → ∞`. This is not
//!   clamped; `|Z| = 0` yields `σ = +inf`.
//!
//! Conventions
//! -----------
//! - The circular routines do not require a normalized input, but `σ` is only
//!   meaningful when `Σ dᵢ · dphi = 1`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover point masses, wrap-around near the branch cut,
//!   divergence for uniform inputs, and agreement of the direct variant with
//!   the circular one for narrow distributions.
use crate::estimation::{
    core::{grid::PhaseGrid, validation::validate_distribution},
    errors::{QPEError, QPEResult},
};
use ndarray::ArrayView1;
use num_complex::Complex64;
use std::f64::consts::PI;

/// EstimationResult — circular mean and dispersion of a phase estimate.
///
/// Fields
/// ------
/// - `mu`: `f64`
///   Circular mean in half turns.
/// - `sigma`: `f64`
///   Holevo standard deviation in half turns (`+inf` when unresolved).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimationResult {
    pub mu: f64,
    pub sigma: f64,
}

impl EstimationResult {
    /// Whether the spread is finite, i.e. the phase was resolved at all.
    pub fn is_resolved(&self) -> bool {
        self.sigma.is_finite()
    }
}

/// First trigonometric moment of a grid distribution.
///
/// Errors
/// ------
/// - Distribution validation errors (`LengthMismatch`, `InvalidPrior`).
pub fn circular_moment(grid: &PhaseGrid, dist: ArrayView1<'_, f64>) -> QPEResult<Complex64> {
    validate_distribution(grid, dist)?;
    let sum: Complex64 = grid
        .points()
        .iter()
        .zip(dist.iter())
        .map(|(&phi, &w)| Complex64::from_polar(w, PI * phi))
        .sum();
    Ok(sum * grid.dphi())
}

/// Circular mean and Holevo spread of a distribution over the grid.
///
/// Parameters
/// ----------
/// - `grid`: `&PhaseGrid`
/// - `dist`: `ArrayView1<f64>`
///   Normalized density over `grid` (e.g. the output of `update`).
///
/// Returns
/// -------
/// `QPEResult<EstimationResult>`
///
/// Errors
/// ------
/// - `QPEError::LengthMismatch` when `dist` and `grid` differ in length.
/// - `QPEError::InvalidPrior` for non-finite weights.
pub fn get_mu_and_sigma(
    grid: &PhaseGrid, dist: ArrayView1<'_, f64>,
) -> QPEResult<EstimationResult> {
    let z = circular_moment(grid, dist)?;
    Ok(from_moment(z))
}

/// Circular mean and Holevo spread of unit point masses.
///
/// Errors
/// ------
/// - `QPEError::EmptyMeasurements` when `points` is empty.
pub fn point_mu_and_sigma(points: &[f64]) -> QPEResult<EstimationResult> {
    if points.is_empty() {
        return Err(QPEError::EmptyMeasurements);
    }
    let sum: Complex64 = points.iter().map(|&phi| Complex64::from_polar(1.0, PI * phi)).sum();
    Ok(from_moment(sum / points.len() as f64))
}

/// Non-circular diagnostic estimate of mean and standard deviation.
///
/// Computes the ordinary mean and standard deviation over the grid, then
/// repeats the computation with the lower half of the grid shifted by +2 and
/// keeps whichever has the smaller spread. The mean is wrapped into `[-1, 1)`.
///
/// Notes
/// -----
/// - Only accurate for localized distributions; prefer
///   [`get_mu_and_sigma`].
///
/// Errors
/// ------
/// - Distribution validation errors.
pub fn direct_mu_and_sigma(
    grid: &PhaseGrid, dist: ArrayView1<'_, f64>,
) -> QPEResult<EstimationResult> {
    validate_distribution(grid, dist)?;
    let dphi = grid.dphi();
    let half = grid.len() / 2;

    let moments = |shift_lower: bool| {
        let shifted = |i: usize, phi: f64| if shift_lower && i < half { phi + 2.0 } else { phi };
        let mu: f64 = grid
            .points()
            .iter()
            .zip(dist.iter())
            .enumerate()
            .map(|(i, (&phi, &w))| w * shifted(i, phi))
            .sum::<f64>()
            * dphi;
        let var: f64 = grid
            .points()
            .iter()
            .zip(dist.iter())
            .enumerate()
            .map(|(i, (&phi, &w))| w * (shifted(i, phi) - mu).powi(2))
            .sum::<f64>()
            * dphi;
        (mu, var.sqrt())
    };

    let (mu0, sigma0) = moments(false);
    let (mu1, sigma1) = moments(true);
    let (mu, sigma) = if sigma1 < sigma0 { (mu1, sigma1) } else { (mu0, sigma0) };
    Ok(EstimationResult { mu: (mu + 1.0).rem_euclid(2.0) - 1.0, sigma })
}

fn from_moment(z: Complex64) -> EstimationResult {
    let r = z.norm();
    let sigma = if r > 0.0 { (r.powi(-2) - 1.0).max(0.0).sqrt() / PI } else { f64::INFINITY };
    EstimationResult { mu: z.arg() / PI, sigma }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Circular mean and Holevo spread for grid distributions and point sets.
    // - Wrap-around behavior at the ±1 branch cut.
    // - Divergence of σ for uniform inputs.
    // - Agreement of the direct diagnostic with the circular estimate.
    // -------------------------------------------------------------------------

    fn spike(grid: &PhaseGrid, index: usize) -> Array1<f64> {
        let mut dist = Array1::zeros(grid.len());
        dist[index] = 1.0 / grid.dphi();
        dist
    }

    fn wrapped_gaussian(grid: &PhaseGrid, center: f64, width: f64) -> Array1<f64> {
        let raw = grid.points().mapv(|phi| {
            let d = (phi - center + 1.0).rem_euclid(2.0) - 1.0;
            (-0.5 * (d / width).powi(2)).exp()
        });
        let norm = raw.sum() * grid.dphi();
        raw / norm
    }

    #[test]
    // Purpose
    // -------
    // A point mass has zero spread and its location as mean.
    //
    // Given
    // -----
    // - Grid of 8 points, all mass on φ = 0.5.
    //
    // Expect
    // ------
    // - μ = 0.5, σ = 0 (up to rounding).
    fn spike_has_zero_spread() {
        let grid = PhaseGrid::new(8).expect("grid");
        let est = get_mu_and_sigma(&grid, spike(&grid, 6).view()).expect("stats");

        assert_relative_eq!(est.mu, 0.5, epsilon = 1e-12);
        assert!(est.sigma < 1e-6);
        assert!(est.is_resolved());
    }

    #[test]
    // Purpose
    // -------
    // The circular mean handles mass straddling the ±1 branch cut.
    //
    // Given
    // -----
    // - Wrapped Gaussian centered at φ = 0.95 with width 0.05.
    //
    // Expect
    // ------
    // - μ ≈ 0.95 and σ ≈ 0.05; the direct variant agrees after shifting.
    fn branch_cut_is_handled() {
        let grid = PhaseGrid::new(2000).expect("grid");
        let dist = wrapped_gaussian(&grid, 0.95, 0.05);

        let est = get_mu_and_sigma(&grid, dist.view()).expect("circular");
        let direct = direct_mu_and_sigma(&grid, dist.view()).expect("direct");

        assert_relative_eq!(est.mu, 0.95, epsilon = 1e-6);
        assert_relative_eq!(est.sigma, 0.05, epsilon = 2e-3);
        assert_relative_eq!(direct.mu, 0.95, epsilon = 1e-6);
        assert_relative_eq!(direct.sigma, 0.05, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // A uniform distribution is unresolved and σ diverges.
    //
    // Given
    // -----
    // - Uniform density 1/2 over a 16-point grid.
    //
    // Expect
    // ------
    // - σ is infinite or astronomically large; never clamped.
    fn uniform_distribution_diverges() {
        let grid = PhaseGrid::new(16).expect("grid");
        let dist = Array1::from_elem(16, 0.5);

        let est = get_mu_and_sigma(&grid, dist.view()).expect("stats");

        assert!(est.sigma > 1e6);
    }

    #[test]
    // Purpose
    // -------
    // Point-mass statistics use the same formula with unit weights.
    //
    // Given
    // -----
    // - Points [0.9, -0.9] symmetric around the branch cut; an empty set.
    //
    // Expect
    // ------
    // - |μ| = 1 and a finite σ; `EmptyMeasurements` for the empty set.
    fn point_masses_wrap_and_reject_empty() {
        let est = point_mu_and_sigma(&[0.9, -0.9]).expect("stats");

        assert_relative_eq!(est.mu.abs(), 1.0, epsilon = 1e-12);
        let r = (0.1 * PI).cos();
        assert_relative_eq!(est.sigma, (r.powi(-2) - 1.0).sqrt() / PI, epsilon = 1e-12);
        assert_eq!(point_mu_and_sigma(&[]), Err(QPEError::EmptyMeasurements));
    }

    #[test]
    // Purpose
    // -------
    // Mismatched lengths are rejected.
    fn length_mismatch_is_rejected() {
        let grid = PhaseGrid::new(4).expect("grid");
        assert!(matches!(
            get_mu_and_sigma(&grid, Array1::zeros(3).view()),
            Err(QPEError::LengthMismatch { .. })
        ));
    }
}

//! Validation helpers for priors and distributions over a phase grid.
//!
//! Purpose
//! -------
//! Centralize the shape and value checks applied to caller-supplied weight
//! arrays before they enter the log domain, so the posterior updater and the
//! circular-statistics routines can fail fast with structured errors.
//!
//! Key behaviors
//! -------------
//! - [`validate_prior`] checks length, finiteness, non-negativity, and total
//!   mass of a prior weight array.
//! - [`validate_distribution`] checks length and finiteness only; it is used
//!   for already normalized posteriors handed to summary statistics.
//! - [`validate_k_max`] guards the candidate set of the k-sampling policy.
//!
//! Conventions
//! -----------
//! - Validation functions return [`QPEResult`] and never panic on invalid
//!   inputs. They contain no I/O and no logging.
use crate::estimation::{
    core::grid::PhaseGrid,
    errors::{QPEError, QPEResult},
};
use ndarray::ArrayView1;

/// Validate a prior weight array against a grid.
///
/// Parameters
/// ----------
/// - `grid`: `&PhaseGrid`
///   Grid the prior is defined on.
/// - `prior`: `ArrayView1<f64>`
///   Non-negative weights, not necessarily normalized.
///
/// Returns
/// -------
/// `QPEResult<f64>`
///   The total mass `Σ prior_i` on success.
///
/// Errors
/// ------
/// - `QPEError::LengthMismatch` when `prior.len() != grid.len()`.
/// - `QPEError::InvalidPrior` for the first non-finite or negative weight.
/// - `QPEError::EmptyPrior` when every weight is zero.
pub fn validate_prior(grid: &PhaseGrid, prior: ArrayView1<'_, f64>) -> QPEResult<f64> {
    if prior.len() != grid.len() {
        return Err(QPEError::LengthMismatch {
            what: "prior",
            expected: grid.len(),
            actual: prior.len(),
        });
    }
    let mut mass = 0.0;
    for (index, &value) in prior.iter().enumerate() {
        if !value.is_finite() {
            return Err(QPEError::InvalidPrior {
                index,
                value,
                reason: "Prior weights must be finite.",
            });
        }
        if value < 0.0 {
            return Err(QPEError::InvalidPrior {
                index,
                value,
                reason: "Prior weights must be non-negative.",
            });
        }
        mass += value;
    }
    if mass <= 0.0 {
        return Err(QPEError::EmptyPrior);
    }
    Ok(mass)
}

/// Validate a distribution passed to summary statistics.
///
/// Errors
/// ------
/// - `QPEError::LengthMismatch` when the lengths disagree.
/// - `QPEError::InvalidPrior` for a non-finite weight.
pub fn validate_distribution(grid: &PhaseGrid, dist: ArrayView1<'_, f64>) -> QPEResult<()> {
    if dist.len() != grid.len() {
        return Err(QPEError::LengthMismatch {
            what: "distribution",
            expected: grid.len(),
            actual: dist.len(),
        });
    }
    if let Some((index, &value)) = dist.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(QPEError::InvalidPrior {
            index,
            value,
            reason: "Distribution weights must be finite.",
        });
    }
    Ok(())
}

pub fn validate_k_max(k_max: u32) -> QPEResult<u32> {
    if k_max == 0 {
        return Err(QPEError::InvalidKMax { k_max });
    }
    Ok(k_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Length, finiteness, sign, and mass checks on priors.
    // - Finiteness checks on distributions.
    // - k_max validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Accept a valid unnormalized prior and report its mass.
    //
    // Given
    // -----
    // - Grid of 4 points, prior [0, 1, 2, 1].
    //
    // Expect
    // ------
    // - Ok(4.0); zero entries are allowed as long as some mass remains.
    fn valid_prior_reports_mass() {
        let grid = PhaseGrid::new(4).expect("grid");
        let prior = array![0.0, 1.0, 2.0, 1.0];
        assert_eq!(validate_prior(&grid, prior.view()), Ok(4.0));
    }

    #[test]
    // Purpose
    // -------
    // Each invalid prior is rejected with the matching variant.
    //
    // Given
    // -----
    // - Wrong length, a negative entry, a NaN entry, all zeros.
    //
    // Expect
    // ------
    // - LengthMismatch, InvalidPrior at index 2, InvalidPrior at index 0,
    //   EmptyPrior.
    fn invalid_priors_are_rejected() {
        let grid = PhaseGrid::new(4).expect("grid");

        assert!(matches!(
            validate_prior(&grid, array![1.0, 1.0].view()),
            Err(QPEError::LengthMismatch { what: "prior", expected: 4, actual: 2 })
        ));
        assert!(matches!(
            validate_prior(&grid, array![1.0, 1.0, -0.5, 1.0].view()),
            Err(QPEError::InvalidPrior { index: 2, .. })
        ));
        assert!(matches!(
            validate_prior(&grid, array![f64::NAN, 1.0, 1.0, 1.0].view()),
            Err(QPEError::InvalidPrior { index: 0, .. })
        ));
        assert_eq!(
            validate_prior(&grid, array![0.0, 0.0, 0.0, 0.0].view()),
            Err(QPEError::EmptyPrior)
        );
    }

    #[test]
    // Purpose
    // -------
    // Distributions may carry zero mass but must be finite and aligned.
    fn distribution_and_k_max_checks() {
        let grid = PhaseGrid::new(3).expect("grid");

        assert!(validate_distribution(&grid, array![0.0, 0.0, 0.0].view()).is_ok());
        assert!(validate_distribution(&grid, array![0.0, f64::INFINITY, 0.0].view()).is_err());
        assert!(validate_distribution(&grid, array![1.0].view()).is_err());
        assert_eq!(validate_k_max(0), Err(QPEError::InvalidKMax { k_max: 0 }));
        assert_eq!(validate_k_max(3), Ok(3));
    }
}

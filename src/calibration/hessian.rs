//! Standard errors from the observed information.
//!
//! The observed information is the finite-difference Hessian of the
//! negative log-likelihood at `θ̂`. Its inverse is taken through a symmetric
//! eigendecomposition, dropping eigenvalues at or below [`EIGEN_EPS`], so a
//! flat direction yields a pseudo-inverse instead of a failure.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        finite_diff::compute_hessian,
        types::{Grad, Hessian, Theta},
    },
    numerical_stability::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::Array1;

/// Standard errors of `θ̂` in optimizer space.
///
/// Parameters
/// ----------
/// - `neg_grad`: `&F`
///   Gradient of the negative log-likelihood, `θ ↦ -∇ℓ(θ)`.
/// - `theta_hat`: `&Theta`
///   Maximum-likelihood estimate.
///
/// Returns
/// -------
/// `OptResult<Array1<f64>>`
///   `SEᵢ = sqrt(Σ_{λₖ > EIGEN_EPS} qᵢₖ² / λₖ)` for the eigenpairs
///   `(λₖ, qₖ)` of the observed information.
///
/// Errors
/// ------
/// - Hessian validation errors from
///   [`compute_hessian`].
pub fn standard_errors<F: Fn(&Theta) -> Grad>(
    neg_grad: &F, theta_hat: &Theta,
) -> OptResult<Array1<f64>> {
    let info = compute_hessian(neg_grad, theta_hat)?;
    Ok(pseudo_inverse_diagonal(&info).mapv(f64::sqrt))
}

fn pseudo_inverse_diagonal(info: &Hessian) -> Array1<f64> {
    let n = info.nrows();
    let eigen = DMatrix::from_fn(n, n, |i, j| info[[i, j]]).symmetric_eigen();
    Array1::from_shape_fn(n, |i| {
        eigen
            .eigenvalues
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, lambda)| eigen.eigenvectors[(i, k)].powi(2) / lambda)
            .sum::<f64>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Standard errors of quadratic objectives with known information.
    // - Pseudo-inverse behavior for a singular direction.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A diagonal information matrix gives SEᵢ = 1/sqrt(Aᵢᵢ).
    //
    // Given
    // -----
    // - Gradient map g(θ) = diag(4, 1) θ.
    //
    // Expect
    // ------
    // - SE ≈ [0.5, 1.0].
    fn diagonal_information_matches_analytic() {
        let grad = |t: &Theta| array![4.0 * t[0], t[1]];
        let se = standard_errors(&grad, &array![0.2, -0.4]).expect("standard errors");
        assert_relative_eq!(se[0], 0.5, epsilon = 1e-5);
        assert_relative_eq!(se[1], 1.0, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // A zero-information direction is dropped rather than inverted.
    //
    // Given
    // -----
    // - Information diag(2, 0).
    //
    // Expect
    // ------
    // - Pseudo-inverse diagonal [0.5, 0].
    fn singular_direction_is_dropped() {
        let diag = pseudo_inverse_diagonal(&array![[2.0, 0.0], [0.0, 0.0]]);
        assert_relative_eq!(diag[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(diag[1], 0.0, epsilon = 1e-12);
    }
}

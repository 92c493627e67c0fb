//! Finiteness and shape checks shared by the optimizer.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::{Grad, Hessian, Theta},
};

/// Check an optional tolerance: finite and strictly positive when present.
///
/// `make` builds the error variant for the tolerance being checked.
fn verify_tol(tol: Option<f64>, make: fn(f64, &'static str) -> OptError) -> OptResult<()> {
    match tol {
        Some(t) if !t.is_finite() => Err(make(t, "Tolerance must be finite.")),
        Some(t) if t <= 0.0 => Err(make(t, "Tolerance must be positive.")),
        _ => Ok(()),
    }
}

pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    verify_tol(tol, |tol, reason| OptError::InvalidTolGrad { tol, reason })
}

pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    verify_tol(tol, |tol, reason| OptError::InvalidTolCost { tol, reason })
}

/// Check that every coordinate of `theta` is finite and that it has `dim`
/// entries.
///
/// Errors
/// ------
/// - `OptError::ThetaLengthMismatch`, `OptError::InvalidThetaInput`.
pub fn validate_theta(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    match theta.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OptError::InvalidThetaInput { index, value: theta[index] }),
        None => Ok(()),
    }
}

/// Errors
/// ------
/// - `OptError::GradientDimMismatch` when `grad.len() != dim`.
/// - `OptError::InvalidGradient` for the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match grad.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OptError::InvalidGradient {
            index,
            value: grad[index],
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameter, rejecting a missing or non-finite one.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some(index) = theta.iter().position(|v| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value: theta[index],
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Errors
/// ------
/// - `OptError::HessianDimMismatch` unless the matrix is `dim × dim`.
/// - `OptError::InvalidHessian` for the first non-finite entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.dim() != (dim, dim) {
        return Err(OptError::HessianDimMismatch { expected: dim, found: hessian.dim() });
    }
    for ((row, col), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row, col, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tolerance checks and the first-offender reporting of vector checks.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances must be finite and positive when present.
    fn tolerances_are_checked() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-8)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(
            verify_tol_cost(Some(f64::NAN)),
            Err(OptError::InvalidTolCost { reason: "Tolerance must be finite.", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Vector and matrix checks report the first offending entry.
    //
    // Given
    // -----
    // - A gradient with NaN at index 1, a θ̂ with +inf at index 0, a Hessian
    //   with NaN at (1, 0), and a wrong-length θ.
    //
    // Expect
    // ------
    // - The matching variants carrying those indices.
    fn first_offender_is_reported() {
        assert!(matches!(
            validate_grad(&array![1.0, f64::NAN], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
        assert!(matches!(
            validate_theta_hat(Some(array![f64::INFINITY, 0.0])),
            Err(OptError::InvalidThetaHat { index: 0, .. })
        ));
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_hessian(&array![[1.0, 0.0], [f64::NAN, 1.0]], 2),
            Err(OptError::InvalidHessian { row: 1, col: 0, .. })
        ));
        assert_eq!(
            validate_theta(&array![0.0], 2),
            Err(OptError::ThetaLengthMismatch { expected: 2, actual: 1 })
        );
    }
}

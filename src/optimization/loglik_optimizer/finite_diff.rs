//! Finite-difference derivatives with error capture and validation.
//!
//! `finitediff` works with infallible `Fn(&Theta) -> f64` closures. The
//! helpers here wrap a fallible objective, remember the first error it
//! raises (returning `NaN` to the differencing routine meanwhile), and turn
//! that error back into a `Result` afterwards.
//!
//! Both helpers try central differences first and fall back to forward
//! differences when the central result cannot be used.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Gradient of a fallible scalar objective at `theta`.
///
/// Errors
/// ------
/// - The first error raised by `objective` during the forward-difference
///   pass.
/// - `OptError::InvalidGradient` when neither scheme yields a finite
///   gradient.
pub fn fd_gradient<G>(theta: &Theta, objective: G) -> OptResult<Grad>
where
    G: Fn(&Theta) -> OptResult<f64>,
{
    let captured: RefCell<Option<OptError>> = RefCell::new(None);
    let scalar = |x: &Theta| match objective(x) {
        Ok(v) => v,
        Err(err) => {
            captured.borrow_mut().get_or_insert(err);
            f64::NAN
        }
    };

    let central = theta.central_diff(&scalar);
    if captured.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }

    captured.replace(None);
    let forward = theta.forward_diff(&scalar);
    if let Some(err) = captured.take() {
        return Err(err);
    }
    validate_grad(&forward, theta.len())?;
    Ok(forward)
}

/// Symmetric Hessian from a gradient function at `theta`.
///
/// Differentiates `grad` once more, then averages the off-diagonal pairs.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback is also unusable.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(grad: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hessian = theta.central_hessian(grad);
    if validate_hessian(&hessian, dim).is_err() {
        hessian = theta.forward_hessian(grad);
        validate_hessian(&hessian, dim)?;
    }
    symmetrize(&mut hessian);
    Ok(hessian)
}

fn symmetrize(hessian: &mut Hessian) {
    let n = hessian.nrows();
    for i in 0..n {
        for j in 0..i {
            let avg = 0.5 * (hessian[[i, j]] + hessian[[j, i]]);
            hessian[[i, j]] = avg;
            hessian[[j, i]] = avg;
        }
    }
}

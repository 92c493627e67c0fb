//! Bridge from a [`LogLikelihood`] to argmin's problem traits.
//!
//! argmin minimizes, so the adapter exposes the cost `c(θ) = -ℓ(θ)` and its
//! gradient `-∇ℓ(θ)`. Models without an analytic gradient are differenced
//! numerically on the cost itself.
use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::fd_gradient,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// ArgMinAdapter — a model plus its data, seen as an argmin problem.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        ArgMinAdapter { f, data }
    }

    fn neg_loglik(&self, theta: &Theta) -> Result<Cost, OptError> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        Ok(-value)
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// `-ℓ(θ)`; a non-finite `ℓ` is reported as `OptError::NonFiniteCost`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.neg_loglik(theta)?)
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `-∇ℓ(θ)` from the model, or a finite-difference gradient of the cost
    /// when the model reports `GradientNotImplemented`.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                Ok(fd_gradient(theta, |x: &Theta| self.neg_loglik(x))?)
            }
            Err(err) => Err(err.into()),
        }
    }
}

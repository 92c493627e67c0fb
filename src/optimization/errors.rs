//! Errors for the argmin-backed log-likelihood optimizer.
//!
//! [`OptError`] covers optimizer configuration, derivative and Hessian
//! validation, objective failures, and errors raised inside argmin. argmin
//! reports everything as `argmin::core::Error`; the `From` conversion below
//! first recovers an [`OptError`] that was raised by our own cost or gradient
//! code, then maps argmin's own error kinds, and only falls back to a
//! stringly-typed backend error when neither matches.
use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// No analytic gradient; the adapter falls back to finite differences.
    GradientNotImplemented,

    GradientDimMismatch { expected: usize, found: usize },

    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    InvalidTolGrad { tol: f64, reason: &'static str },

    InvalidTolCost { tol: f64, reason: &'static str },

    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// Every stopping rule was left unset.
    NoTolerancesProvided,

    InvalidLineSearch { name: String, reason: &'static str },

    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Objective ----
    /// Log-likelihood evaluated to NaN/±inf.
    NonFiniteCost { value: f64 },

    /// θ has the wrong number of coordinates for the model.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// θ coordinate is NaN/±inf.
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Optimizer outcome ----
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Solver finished without recording a best parameter.
    MissingThetaHat,

    // ---- argmin ----
    InvalidParameter { text: String },

    NotImplemented { text: String },

    NotInitialized { text: String },

    ConditionViolated { text: String },

    CheckPointNotFound { text: String },

    PotentialBug { text: String },

    ImpossibleError { text: String },

    /// Any other error surfaced through argmin, rendered as text.
    BackendError { text: String },

    // ---- Finite differences ----
    HessianDimMismatch { expected: usize, found: (usize, usize) },

    InvalidHessian { row: usize, col: usize, value: f64 },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented; finite differences are used.")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient has {found} entries; expected {expected}.")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Gradient entry {index} is invalid ({value}): {reason}")
            }
            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid iteration cap {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "At least one of tol_grad, tol_cost, or max_iter must be set.")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Unknown line search '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            // ---- Objective ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Log-likelihood is not finite: {value}")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector has length {actual}; expected {expected}.")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Parameter {index} must be finite; got {value}")
            }
            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Estimate at index {index} is invalid ({value}): {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Optimizer returned no parameter estimate.")
            }
            // ---- argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug in solver: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Optimizer backend error: {text}"),
            // ---- Finite differences ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(f, "Hessian has shape {found:?}; expected ({expected}, {expected}).")
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Hessian entry ({row}, {col}) is not finite: {value}")
            }
            // ---- Fallback ----
            OptError::UnknownError => write!(f, "Unknown optimizer error."),
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recovery of our own errors after a round trip through argmin's error.
    // - Mapping of argmin error kinds and the text fallback.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An `OptError` raised inside a cost function survives argmin.
    //
    // Given
    // -----
    // - `NonFiniteCost` converted into `argmin::core::Error` and back.
    //
    // Expect
    // ------
    // - The same variant and payload.
    fn opt_error_round_trips_through_argmin() {
        let original = OptError::NonFiniteCost { value: f64::INFINITY };
        let wrapped: Error = original.clone().into();
        assert_eq!(OptError::from(wrapped), original);
    }

    #[test]
    // Purpose
    // -------
    // argmin's own errors map to named variants; others become text.
    fn argmin_errors_are_mapped() {
        let argmin_err: Error = ArgminError::NotImplemented { text: "hessian".into() }.into();
        assert_eq!(OptError::from(argmin_err), OptError::NotImplemented { text: "hessian".into() });

        let io_err: Error = std::io::Error::other("disk").into();
        assert!(matches!(OptError::from(io_err), OptError::BackendError { .. }));
    }
}

//! Errors for error-rate calibration.
//!
//! [`CalibError`] covers benchmark-data validation and fit configuration,
//! and wraps failures of the optimizer ([`OptError`]) and of the estimation
//! types a fit produces ([`QPEError`]).
use crate::{estimation::errors::QPEError, optimization::errors::OptError};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type CalibResult<T> = Result<T, CalibError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CalibError {
    // ---- Benchmark data ----
    /// No benchmark circuits were supplied.
    EmptyData,

    LengthMismatch { what: &'static str, expected: usize, actual: usize },

    /// Repetition count of zero at `index`.
    InvalidK { index: usize },

    /// Observed `p0` outside `[0, 1]` or non-finite.
    InvalidProbability { index: usize, value: f64 },

    /// Zero shots recorded for a circuit.
    InvalidShotCount { index: usize },

    // ---- Configuration ----
    /// Starting λ must lie strictly inside `(0, 1)`.
    InvalidInitialLambda { value: f64 },

    /// Confidence level must lie strictly inside `(0, 1)`.
    InvalidConfidence { level: f64 },

    // ---- Wrapped ----
    Optimization(OptError),

    Estimation(QPEError),
}

impl std::error::Error for CalibError {}

impl std::fmt::Display for CalibError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalibError::EmptyData => write!(f, "Calibration needs at least one benchmark circuit."),
            CalibError::LengthMismatch { what, expected, actual } => {
                write!(f, "Length of '{what}' is {actual}; expected {expected}.")
            }
            CalibError::InvalidK { index } => {
                write!(f, "Repetition count at index {index} must be >= 1.")
            }
            CalibError::InvalidProbability { index, value } => {
                write!(f, "Observed p0 at index {index} must lie in [0, 1]; got {value}")
            }
            CalibError::InvalidShotCount { index } => {
                write!(f, "Shot count at index {index} must be positive.")
            }
            CalibError::InvalidInitialLambda { value } => {
                write!(f, "Initial lambda must lie in (0, 1); got {value}")
            }
            CalibError::InvalidConfidence { level } => {
                write!(f, "Confidence level must lie in (0, 1); got {level}")
            }
            CalibError::Optimization(err) => write!(f, "Calibration fit failed: {err}"),
            CalibError::Estimation(err) => write!(f, "{err}"),
        }
    }
}

impl From<OptError> for CalibError {
    fn from(err: OptError) -> Self {
        CalibError::Optimization(err)
    }
}

impl From<QPEError> for CalibError {
    fn from(err: QPEError) -> Self {
        CalibError::Estimation(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<CalibError> for PyErr {
    fn from(err: CalibError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

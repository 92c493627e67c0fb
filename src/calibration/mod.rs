//! calibration — fitting the error model the estimator consumes.
//!
//! Purpose
//! -------
//! Turn benchmark-circuit results into a [`DepolarizingRate`] for the
//! noise-aware likelihood. The fit is maximum likelihood on the argmin
//! optimizer in [`crate::optimization`].
//!
//! Key behaviors
//! -------------
//! - [`depolarizing`]: data container, binomial model, [`fit_depolarizing`],
//!   and the [`DepolarizingFit`] summary.
//! - [`hessian`]: standard errors from the observed information.
//! - [`errors`]: [`CalibError`] / [`CalibResult`].
//!
//! Downstream usage
//! ----------------
//! - Build [`CalibrationData`], call [`fit_depolarizing`], then pass
//!   `fit.rate_model()?.as_fn()` to the posterior updater.
//!
//! [`DepolarizingRate`]: crate::estimation::core::rates::DepolarizingRate

pub mod depolarizing;
pub mod errors;
pub mod hessian;

pub use self::depolarizing::{
    CalibrationData, CalibrationOptions, DEFAULT_LAMBDA_INIT, DepolarizingFit, DepolarizingModel,
    depolarizing_p0, fit_depolarizing,
};
pub use self::errors::{CalibError, CalibResult};
pub use self::hessian::standard_errors;

//! loglik_optimizer — argmin-backed maximum-likelihood fitting.
//!
//! Purpose
//! -------
//! Maximize a model log-likelihood `ℓ(θ)` over an unconstrained parameter
//! vector with L-BFGS. Models implement [`LogLikelihood`] and call
//! [`maximize`].
//!
//! Key behaviors
//! -------------
//! - [`adapter`] turns `ℓ` into argmin's cost `-ℓ` and supplies gradients,
//!   falling back to [`finite_diff`] when the model has no analytic one.
//! - [`solver`] builds L-BFGS with the chosen line search and runs it.
//! - [`options`] holds [`MLEOptions`], [`Tolerances`], and [`OptimOutcome`].
//! - [`finite_diff::compute_hessian`] provides the observed information used
//!   for standard errors.
//!
//! Conventions
//! -----------
//! - Values and gradients reported to callers are on the log-likelihood
//!   scale; the sign flip lives only in the adapter.
//! - Constrained model parameters are mapped to ℝ by the model layer.
//! - Failures are [`OptError`](crate::optimization::errors::OptError)
//!   values; nothing here panics on bad input.

pub mod adapter;
pub mod finite_diff;
pub mod options;
pub mod solver;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::options::{LineSearcher, MLEOptions, OptimOutcome, Tolerances};
pub use self::solver::maximize;
pub use self::traits::LogLikelihood;
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::{
        Grad, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Theta, Tolerances, maximize,
    };
}

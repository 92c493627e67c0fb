//! optimization — numerical machinery for maximum-likelihood calibration.
//!
//! Purpose
//! -------
//! Host the generic pieces that calibration models build on: an
//! argmin-backed L-BFGS maximizer ([`loglik_optimizer`]), guarded parameter
//! transforms ([`numerical_stability`]), and the shared error type
//! ([`errors`]).
//!
//! Conventions
//! -----------
//! - Models expose `ℓ(θ)` through
//!   [`LogLikelihood`](loglik_optimizer::LogLikelihood); the optimizer never
//!   sees constrained parameters.
//! - Every fallible routine returns
//!   [`OptResult`](errors::OptResult).

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// Downstream crates can write
//
//     use rust_qpe::optimization::prelude::*;
//
// to import the optimizer surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}

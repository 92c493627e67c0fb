//! numerical_stability — guarded transforms for constrained parameters.
//!
//! Probabilities are fitted on the logit scale. [`safe_logit`] and
//! [`safe_logistic`] map between the two scales without overflow, and
//! [`logistic_derivative`] carries standard errors back through the map.
//! [`EIGEN_EPS`] is the cutoff for treating an information eigenvalue as
//! zero.

pub mod transformations;

pub use self::transformations::{
    EIGEN_EPS, LOGIT_EPS, logistic_derivative, safe_logistic, safe_logit,
};

pub mod prelude {
    pub use super::{EIGEN_EPS, LOGIT_EPS, logistic_derivative, safe_logistic, safe_logit};
}

//! The model-side contract of the optimizer.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::{Cost, Grad, Theta},
};

/// LogLikelihood — a model whose log-likelihood `ℓ(θ)` is to be maximized.
///
/// Implementors return `ℓ(θ)` itself (never the cost) and, when available,
/// its gradient `∇ℓ(θ)`. The optimizer minimizes `-ℓ(θ)` internally and
/// flips signs as needed.
///
/// Required
/// --------
/// - `value`: evaluate `ℓ(θ)`; report invalid inputs as `OptError`.
/// - `check`: reject an unusable `(θ, data)` pair before the first
///   iteration.
///
/// Optional
/// --------
/// - `grad`: analytic `∇ℓ(θ)`. The default signals
///   `OptError::GradientNotImplemented`, which switches the adapter to
///   finite differences.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

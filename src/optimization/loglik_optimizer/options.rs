//! Optimizer configuration and the normalized run outcome.
//!
//! - [`Tolerances`]: stopping rules; at least one must be set.
//! - [`LineSearcher`]: line search inside L-BFGS, parseable from a string.
//! - [`MLEOptions`]: tolerances, line search, L-BFGS memory, verbosity.
//! - [`OptimOutcome`]: best parameter and diagnostics, reported on the
//!   log-likelihood scale.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        types::{FnEvalMap, Grad, Theta},
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Tolerances — stopping rules for a single optimizer run.
///
/// Fields
/// ------
/// - `tol_grad`: stop once the gradient norm drops below this value.
/// - `tol_cost`: stop once the change in cost drops below this value.
/// - `max_iter`: iteration cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Errors
    /// ------
    /// - `OptError::NoTolerancesProvided` when all three are `None`.
    /// - `OptError::InvalidTolGrad` / `OptError::InvalidTolCost` for a
    ///   non-finite or non-positive tolerance.
    /// - `OptError::InvalidMaxIter` when `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Tolerances { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    /// `tol_grad = 1e-6`, no cost rule, at most 300 iterations.
    fn default() -> Self {
        Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) }
    }
}

/// Line search used by L-BFGS.
///
/// Parses case-insensitively from `"MoreThuente"` or `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("morethuente") {
            Ok(LineSearcher::MoreThuente)
        } else if s.eq_ignore_ascii_case("hagerzhang") {
            Ok(LineSearcher::HagerZhang)
        } else {
            Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Expected 'MoreThuente' or 'HagerZhang' (any case).",
            })
        }
    }
}

/// MLEOptions — everything the solver layer needs besides the model.
///
/// `verbose` attaches a terminal observer when the `obs_slog` feature is
/// enabled and is ignored otherwise. `lbfgs_mem = None` means
/// [`DEFAULT_LBFGS_MEM`](crate::optimization::loglik_optimizer::types::DEFAULT_LBFGS_MEM).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Errors
    /// ------
    /// - `OptError::InvalidLBFGSMem` when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(MLEOptions { tols, line_searcher, verbose, lbfgs_mem })
    }
}

/// OptimOutcome — result of [`maximize`](crate::optimization::loglik_optimizer::maximize).
///
/// Fields
/// ------
/// - `theta_hat`: best parameter found.
/// - `value`: `ℓ(θ̂)`, the log-likelihood (not the cost).
/// - `converged`: `false` only when the solver never reported termination.
/// - `status`: argmin's termination status rendered as text.
/// - `iterations`, `fn_evals`: solver counters.
/// - `grad_norm`: L2 norm of the last cost gradient, when recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build an outcome from raw solver state.
    ///
    /// Errors
    /// ------
    /// - `OptError::MissingThetaHat` / `OptError::InvalidThetaHat` for an
    ///   absent or non-finite best parameter.
    /// - `OptError::NonFiniteCost` for a non-finite `value`.
    pub fn new(
        theta_hat: Option<Theta>, value: f64, status: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(value)?;
        let converged = !matches!(status, TerminationStatus::NotTerminated);
        Ok(OptimOutcome {
            theta_hat,
            value,
            converged,
            status: format!("{status:?}"),
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }
}

//! L-BFGS construction and execution.
//!
//! [`maximize`] is the entry point: it checks the starting point, builds
//! L-BFGS with the requested line search, runs it through argmin's
//! `Executor`, and returns an [`OptimOutcome`] on the log-likelihood scale.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        options::{LineSearcher, MLEOptions, OptimOutcome},
        traits::LogLikelihood,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};
use argmin::{
    core::{Executor, IterState, Solver, State},
    solver::quasinewton::LBFGS,
};

/// Maximize `f`'s log-likelihood starting from `theta0`.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Model implementing [`LogLikelihood`].
/// - `theta0`: [`Theta`]
///   Starting point in unconstrained space.
/// - `data`: `&F::Data`
/// - `opts`: `&MLEOptions`
///
/// Errors
/// ------
/// - Anything `f.check` returns for `theta0`.
/// - Solver failures converted from argmin (see
///   [`OptError`](crate::optimization::errors::OptError)).
/// - Outcome validation errors (missing or non-finite estimate).
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = with_tolerances(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = with_tolerances(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Apply the gradient and cost tolerances that are set in `opts`.
///
/// Errors
/// ------
/// - argmin's own rejection of a tolerance, converted to `OptError`.
pub fn with_tolerances<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(tol) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(tol)?;
    }
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(tol)?;
    }
    Ok(solver)
}

/// Execute `solver` on `problem` from `theta0` and collect the outcome.
///
/// With the `obs_slog` feature and `opts.verbose`, iterations are streamed to
/// the terminal through argmin's slog observer.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    let mut executor = Executor::new(problem, solver).configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        );
    }

    let mut state = executor.run()?.state().clone();
    tracing::debug!(
        iterations = state.get_iter(),
        best_cost = state.get_best_cost(),
        "L-BFGS finished"
    );
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let status = state.get_termination_status().clone();
    let grad = state.take_gradient();
    let best_cost = state.get_best_cost();
    OptimOutcome::new(state.take_best_param(), -best_cost, status, iterations, fn_evals, grad)
}

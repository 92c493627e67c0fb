//! Numeric aliases and concrete solver types for the optimizer.
//!
//! Everything is `ndarray` over `f64`. The L-BFGS aliases fix argmin's
//! `(Param, Gradient, Float)` generics to these shapes so the rest of the
//! optimizer never spells them out.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient with the same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `n × n` second-derivative matrix.
pub type Hessian = Array2<f64>;

/// Scalar objective (`-ℓ(θ)` inside argmin).
pub type Cost = f64;

/// argmin evaluation counters keyed by name (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length used when the options leave it unset.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

//! Argument extraction for the Python bindings.
//!
//! Converts loosely typed Python inputs (numpy arrays, pandas Series, plain
//! sequences) into the validated estimation types, and maps an optional
//! depolarizing `lambda_d` to an error-rate model.
#[cfg(feature = "python-bindings")]
use crate::estimation::{
    core::{
        grid::PhaseGrid,
        measurement::MeasurementSet,
        rates::{DepolarizingRate, RateFn},
    },
    errors::QPEResult,
};
#[cfg(feature = "python-bindings")]
use ndarray::Array1;
#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1};
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

/// Read a 1-D float64 array from a numpy array, a pandas Series, or any
/// sequence of floats.
///
/// Errors
/// ------
/// - `TypeError` when the object is none of those.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        if arr.as_slice().is_ok() {
            return Ok(arr);
        }
    }
    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray1<f64>>() {
            if arr.as_slice().is_ok() {
                return Ok(arr);
            }
        }
    }
    let values: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(values.into_pyarray(py).readonly())
}

/// Owned copy of a float array argument.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    Ok(extract_f64_array(py, raw)?.as_array().to_owned())
}

/// Grid from its points.
#[cfg(feature = "python-bindings")]
pub fn extract_grid<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<PhaseGrid> {
    Ok(PhaseGrid::from_points(extract_f64_vec(py, raw)?)?)
}

/// Measurement set from parallel `ks`, `betas`, `ms` columns; `None` in
/// `ms` marks a discarded shot.
#[cfg(feature = "python-bindings")]
pub fn extract_measurements<'py>(
    py: Python<'py>, ks: Vec<u32>, betas: &Bound<'py, PyAny>, ms: Vec<Option<u8>>,
) -> PyResult<MeasurementSet> {
    let betas = extract_f64_vec(py, betas)?.to_vec();
    Ok(MeasurementSet::from_columns(&ks, &betas, &ms)?)
}

/// Run `body` with the depolarizing error model for `lambda_d`, or with no
/// model when `lambda_d` is `None`.
///
/// Errors
/// ------
/// - `ValueError` when `lambda_d` is outside `[0, 1]`, or whatever `body`
///   returns.
#[cfg(feature = "python-bindings")]
pub fn with_rate<T>(
    lambda_d: Option<f64>, body: impl FnOnce(Option<RateFn<'_>>) -> QPEResult<T>,
) -> PyResult<T> {
    let Some(lambda) = lambda_d else {
        return Ok(body(None)?);
    };
    let model = DepolarizingRate::new(lambda)?;
    let rate = move |k: u32| model.rate(k);
    let rate_fn: RateFn<'_> = &rate;
    Ok(body(Some(rate_fn))?)
}

//! Phase grid for grid-based Bayesian estimation.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the discretized periodic phase
//! domain on which priors, likelihoods, and posteriors are represented.
//!
//! Key behaviors
//! -------------
//! - [`PhaseGrid::new`] builds the canonical grid of `n` equally spaced points
//!   spanning `[-1, 1)` (period 2), i.e. `φᵢ = -1 + 2i/n`.
//! - [`PhaseGrid::from_points`] accepts caller-supplied, equally spaced points
//!   (for example the `[0, 2)` convention used by circuit toolkits) and derives
//!   the resolution from the first step.
//! - Exposes the resolution `dphi`, a flat prior, and nearest-point lookup
//!   modulo 2.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two points.
//! - Every point is finite and consecutive steps are equal to `dphi` up to a
//!   relative tolerance of `1e-9`.
//! - The grid is immutable after construction.
//!
//! Conventions
//! -----------
//! - Phases are in half turns: a phase `φ` corresponds to the angle `πφ`, and
//!   values are identified modulo 2.
//! - The integral of a distribution `d` over the grid is `Σ dᵢ · dphi`.
//!
//! Downstream usage
//! ----------------
//! - Build one grid per experiment and pass it by reference to the posterior
//!   updater, circular statistics, and bootstrap routines.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the canonical layout, resolution, rejection of tiny and
//!   irregular grids, and wrap-around nearest-point lookup.
use crate::estimation::errors::{QPEError, QPEResult};
use ndarray::Array1;

/// Relative tolerance used when checking that grid steps are uniform.
const SPACING_RTOL: f64 = 1e-9;

/// `PhaseGrid` — equally spaced phase points over one period.
///
/// Fields
/// ------
/// - `points`: `Array1<f64>`
///   Grid points in increasing order.
/// - `dphi`: `f64`
///   Resolution (step between consecutive points).
///
/// Invariants
/// ----------
/// - `points.len() >= 2`, all points finite, steps uniform and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseGrid {
    points: Array1<f64>,
    dphi: f64,
}

impl PhaseGrid {
    /// Build the canonical grid of `n` points over `[-1, 1)`.
    ///
    /// Errors
    /// ------
    /// - `QPEError::GridTooSmall` when `n < 2`.
    pub fn new(n: usize) -> QPEResult<Self> {
        if n < 2 {
            return Err(QPEError::GridTooSmall { len: n });
        }
        let dphi = 2.0 / n as f64;
        let points = Array1::from_iter((0..n).map(|i| -1.0 + dphi * i as f64));
        Ok(PhaseGrid { points, dphi })
    }

    /// Build a grid from explicit, equally spaced points.
    ///
    /// Parameters
    /// ----------
    /// - `points`: `Array1<f64>`
    ///   Increasing, equally spaced phases. Any origin is allowed; the period
    ///   is still 2.
    ///
    /// Errors
    /// ------
    /// - `QPEError::GridTooSmall` when fewer than two points are supplied.
    /// - `QPEError::NonFiniteGridPoint` for NaN/±inf entries.
    /// - `QPEError::NonUniformGrid` when a step differs from the first one or
    ///   the first step is not positive.
    pub fn from_points(points: Array1<f64>) -> QPEResult<Self> {
        if points.len() < 2 {
            return Err(QPEError::GridTooSmall { len: points.len() });
        }
        for (index, &value) in points.iter().enumerate() {
            if !value.is_finite() {
                return Err(QPEError::NonFiniteGridPoint { index, value });
            }
        }
        let dphi = points[1] - points[0];
        if dphi <= 0.0 {
            return Err(QPEError::NonUniformGrid { index: 0, spacing: dphi, expected: dphi });
        }
        for index in 1..points.len() - 1 {
            let spacing = points[index + 1] - points[index];
            if (spacing - dphi).abs() > SPACING_RTOL * dphi.max(1.0) {
                return Err(QPEError::NonUniformGrid { index, spacing, expected: dphi });
            }
        }
        Ok(PhaseGrid { points, dphi })
    }

    /// Number of grid points `N`.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a valid grid holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Grid resolution `dphi`.
    pub fn dphi(&self) -> f64 {
        self.dphi
    }

    /// Grid points in increasing order.
    pub fn points(&self) -> &Array1<f64> {
        &self.points
    }

    /// Flat, unnormalized prior (all ones).
    pub fn uniform_prior(&self) -> Array1<f64> {
        Array1::ones(self.len())
    }

    /// Index of the grid point closest to `phi` modulo 2.
    pub fn nearest_index(&self, phi: f64) -> usize {
        let origin = self.points[0];
        let offset = (phi - origin).rem_euclid(2.0);
        let index = (offset / self.dphi).round() as usize;
        index % self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Canonical grid layout over [-1, 1) and its resolution.
    // - Validation of explicit point sets (size, finiteness, spacing).
    // - Nearest-point lookup with wrap-around modulo 2.
    //
    // They intentionally DO NOT cover:
    // - How distributions are normalized over the grid (posterior tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the canonical grid layout.
    //
    // Given
    // -----
    // - n = 4.
    //
    // Expect
    // ------
    // - Points [-1, -0.5, 0, 0.5] and dphi = 0.5.
    fn new_builds_half_open_period() {
        // Act
        let grid = PhaseGrid::new(4).expect("grid of 4 points should build");

        // Assert
        assert_eq!(grid.len(), 4);
        assert_relative_eq!(grid.dphi(), 0.5);
        for (got, want) in grid.points().iter().zip([-1.0, -0.5, 0.0, 0.5]) {
            assert_relative_eq!(*got, want);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure tiny grids are rejected.
    //
    // Given
    // -----
    // - n = 1 and a single explicit point.
    //
    // Expect
    // ------
    // - `QPEError::GridTooSmall` in both cases.
    fn tiny_grids_are_rejected() {
        assert_eq!(PhaseGrid::new(1), Err(QPEError::GridTooSmall { len: 1 }));
        assert_eq!(
            PhaseGrid::from_points(array![0.0]),
            Err(QPEError::GridTooSmall { len: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Accept the [0, 2) convention and reject irregular spacing.
    //
    // Given
    // -----
    // - A regular grid [0, 0.5, 1, 1.5].
    // - An irregular grid [0, 0.5, 1.2, 1.5].
    //
    // Expect
    // ------
    // - The regular grid builds with dphi = 0.5.
    // - The irregular one fails with `NonUniformGrid` at index 1.
    fn from_points_checks_spacing() {
        // Act
        let regular = PhaseGrid::from_points(array![0.0, 0.5, 1.0, 1.5]);
        let irregular = PhaseGrid::from_points(array![0.0, 0.5, 1.2, 1.5]);

        // Assert
        assert_relative_eq!(regular.expect("regular grid").dphi(), 0.5);
        match irregular {
            Err(QPEError::NonUniformGrid { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected NonUniformGrid, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Nearest-point lookup must wrap modulo 2.
    //
    // Given
    // -----
    // - The canonical grid with n = 8 (dphi = 0.25).
    //
    // Expect
    // ------
    // - 0.24 maps to 0.25 (index 5); 0.99 wraps to -1 (index 0); 2.5 maps to
    //   0.5 (index 6).
    fn nearest_index_wraps_modulo_two() {
        let grid = PhaseGrid::new(8).expect("grid");
        assert_eq!(grid.nearest_index(0.24), 5);
        assert_eq!(grid.nearest_index(0.99), 0);
        assert_eq!(grid.nearest_index(2.5), 6);
    }
}

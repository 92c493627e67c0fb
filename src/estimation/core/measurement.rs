//! Measurement records for iterative phase estimation.
//!
//! Purpose
//! -------
//! Represent single-shot measurement triples `(k, β, m)` produced by an
//! external circuit-execution layer, and ordered collections of them.
//!
//! Key behaviors
//! -------------
//! - [`Outcome`] is the measured bit; a discarded (post-selected away) shot is
//!   represented by `m = None` on [`Measurement`].
//! - [`MeasurementSet`] preserves insertion order, which keeps bootstrap
//!   resampling reproducible for a fixed seed.
//! - Column-wise construction mirrors how experiments record `ks`, `betas`,
//!   and `ms`; shot histograms can be expanded into one record per shot.
//! - [`binary_fraction`] converts big-endian readouts into phases.
//!
//! Invariants & assumptions
//! ------------------------
//! - `k >= 1` and `β` finite for every stored measurement.
//! - `β` is interpreted modulo 2 by the likelihood; it is stored as given.
//!
//! Downstream usage
//! ----------------
//! - The posterior updater iterates a [`MeasurementSet`] and skips discarded
//!   shots; the bootstrap estimator resamples it by index.
use crate::estimation::errors::{QPEError, QPEResult};
use std::collections::BTreeMap;

/// Measured bit of a single shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Zero,
    One,
}

impl Outcome {
    /// Convert a raw bit into an [`Outcome`].
    ///
    /// Errors
    /// ------
    /// - `QPEError::InvalidOutcome` for anything other than 0 or 1.
    pub fn from_bit(bit: u8) -> QPEResult<Self> {
        match bit {
            0 => Ok(Outcome::Zero),
            1 => Ok(Outcome::One),
            value => Err(QPEError::InvalidOutcome { value }),
        }
    }

    /// Raw bit value.
    pub fn bit(self) -> u8 {
        match self {
            Outcome::Zero => 0,
            Outcome::One => 1,
        }
    }

    /// The factor `(-1)^m` of the likelihood.
    pub fn sign(self) -> f64 {
        match self {
            Outcome::Zero => 1.0,
            Outcome::One => -1.0,
        }
    }
}

/// `Measurement` — one shot `(k, β, m)`.
///
/// Fields
/// ------
/// - `k`: `u32`
///   Number of controlled-unitary repetitions (`>= 1`).
/// - `beta`: `f64`
///   Finite rotation offset in half turns applied before the X measurement.
/// - `m`: `Option<Outcome>`
///   Measured bit, or `None` for a discarded shot.
///
/// Fields are private; every constructor validates `k` and `beta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    k: u32,
    beta: f64,
    m: Option<Outcome>,
}

impl Measurement {
    /// Construct a validated measurement.
    ///
    /// Errors
    /// ------
    /// - `QPEError::InvalidK` when `k == 0`.
    /// - `QPEError::InvalidBeta` when `beta` is not finite.
    pub fn new(k: u32, beta: f64, m: Option<Outcome>) -> QPEResult<Self> {
        if k == 0 {
            return Err(QPEError::InvalidK { k });
        }
        if !beta.is_finite() {
            return Err(QPEError::InvalidBeta { index: 0, value: beta });
        }
        Ok(Measurement { k, beta, m })
    }

    /// Repetition count `k`.
    pub fn k(&self) -> u32 {
        self.k
    }

    /// Rotation offset `β` in half turns.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Measured bit, `None` when discarded.
    pub fn outcome(&self) -> Option<Outcome> {
        self.m
    }

    /// Whether the shot was discarded by post-selection.
    pub fn is_discarded(&self) -> bool {
        self.m.is_none()
    }
}

/// Shot histogram of one circuit: readout bits → number of shots.
pub type ShotCounts = BTreeMap<Vec<u8>, usize>;

/// `MeasurementSet` — ordered sequence of validated measurements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    measurements: Vec<Measurement>,
}

impl MeasurementSet {
    /// Wrap measurements built by [`Measurement::new`].
    pub fn new(measurements: Vec<Measurement>) -> Self {
        MeasurementSet { measurements }
    }

    /// Build a set from parallel columns `ks`, `betas`, `ms`.
    ///
    /// Parameters
    /// ----------
    /// - `ks`: `&[u32]`
    ///   Repetition counts, each `>= 1`.
    /// - `betas`: `&[f64]`
    ///   Finite rotation offsets; same length as `ks`.
    /// - `ms`: `&[Option<u8>]`
    ///   Outcome bits (0/1) or `None` for discarded shots; same length as `ks`.
    ///
    /// Errors
    /// ------
    /// - `QPEError::LengthMismatch` when the columns disagree in length.
    /// - `QPEError::InvalidK`, `QPEError::InvalidBeta`,
    ///   `QPEError::InvalidOutcome` for the first offending entry.
    pub fn from_columns(ks: &[u32], betas: &[f64], ms: &[Option<u8>]) -> QPEResult<Self> {
        if betas.len() != ks.len() {
            return Err(QPEError::LengthMismatch {
                what: "betas",
                expected: ks.len(),
                actual: betas.len(),
            });
        }
        if ms.len() != ks.len() {
            return Err(QPEError::LengthMismatch {
                what: "ms",
                expected: ks.len(),
                actual: ms.len(),
            });
        }
        let mut measurements = Vec::with_capacity(ks.len());
        for (index, ((&k, &beta), &m)) in ks.iter().zip(betas).zip(ms).enumerate() {
            if k == 0 {
                return Err(QPEError::InvalidK { k });
            }
            if !beta.is_finite() {
                return Err(QPEError::InvalidBeta { index, value: beta });
            }
            let m = m.map(Outcome::from_bit).transpose()?;
            measurements.push(Measurement { k, beta, m });
        }
        Ok(MeasurementSet { measurements })
    }

    /// Expand per-circuit shot histograms into one measurement per shot.
    ///
    /// Circuit `i` was run with `k_list[i]` and `beta_list[i]`; every shot in
    /// `counts[i]` becomes one record. A readout equal to `[0]` is
    /// [`Outcome::Zero`]; any other readout is [`Outcome::One`]. Shots are
    /// emitted circuit by circuit, readouts in ascending bit order.
    ///
    /// Errors
    /// ------
    /// - `QPEError::LengthMismatch` when the three lists disagree in length.
    /// - `QPEError::InvalidK` / `QPEError::InvalidBeta` for invalid settings.
    pub fn from_shot_counts(
        k_list: &[u32], beta_list: &[f64], counts: &[ShotCounts],
    ) -> QPEResult<Self> {
        if beta_list.len() != k_list.len() {
            return Err(QPEError::LengthMismatch {
                what: "beta_list",
                expected: k_list.len(),
                actual: beta_list.len(),
            });
        }
        if counts.len() != k_list.len() {
            return Err(QPEError::LengthMismatch {
                what: "counts",
                expected: k_list.len(),
                actual: counts.len(),
            });
        }
        let mut measurements = Vec::new();
        let circuits = k_list.iter().zip(beta_list).zip(counts).enumerate();
        for (index, ((&k, &beta), histogram)) in circuits {
            if k == 0 {
                return Err(QPEError::InvalidK { k });
            }
            if !beta.is_finite() {
                return Err(QPEError::InvalidBeta { index, value: beta });
            }
            for (readout, &count) in histogram {
                let m = if readout.as_slice() == [0] { Outcome::Zero } else { Outcome::One };
                measurements
                    .extend(std::iter::repeat(Measurement { k, beta, m: Some(m) }).take(count));
            }
        }
        Ok(MeasurementSet { measurements })
    }

    /// Number of measurements, discarded shots included.
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Whether the set holds no measurements.
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Number of shots that were not discarded.
    pub fn n_retained(&self) -> usize {
        self.measurements.iter().filter(|m| !m.is_discarded()).count()
    }

    /// Iterate measurements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.measurements.iter()
    }

    /// Borrow the measurements as a slice.
    pub fn as_slice(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Append a measurement.
    pub fn push(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    /// First `n` measurements (all of them when `n >= len`).
    pub fn truncated(&self, n: usize) -> MeasurementSet {
        let n = n.min(self.len());
        MeasurementSet { measurements: self.measurements[..n].to_vec() }
    }

    /// Gather measurements at `indices` (repeats allowed).
    ///
    /// Panics
    /// ------
    /// - Panics if an index is out of bounds; callers draw indices in
    ///   `0..len()`.
    pub fn resample(&self, indices: &[usize]) -> MeasurementSet {
        MeasurementSet { measurements: indices.iter().map(|&i| self.measurements[i]).collect() }
    }

    /// Split back into `(ks, betas, ms)` columns.
    pub fn to_columns(&self) -> (Vec<u32>, Vec<f64>, Vec<Option<u8>>) {
        let ks = self.measurements.iter().map(|m| m.k).collect();
        let betas = self.measurements.iter().map(|m| m.beta).collect();
        let ms = self.measurements.iter().map(|m| m.m.map(Outcome::bit)).collect();
        (ks, betas, ms)
    }
}

impl<'a> IntoIterator for &'a MeasurementSet {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.measurements.iter()
    }
}

impl FromIterator<Measurement> for MeasurementSet {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        MeasurementSet { measurements: iter.into_iter().collect() }
    }
}

/// Convert a big-endian bit string into a phase in `[0, 2)`.
///
/// The first bit carries weight 1, the next 1/2, and so on:
/// `[1, 0, 0] → 1.0`, `[0, 0, 1] → 0.25`.
///
/// Errors
/// ------
/// - `QPEError::InvalidOutcome` for the first entry that is not 0 or 1.
pub fn binary_fraction(readout: &[u8]) -> QPEResult<f64> {
    readout.iter().enumerate().try_fold(0.0, |acc, (i, &bit)| {
        let bit = Outcome::from_bit(bit)?.bit();
        Ok(acc + f64::from(bit) * 0.5_f64.powi(i as i32))
    })
}

//! k-sampling policy — weighted random design of repetition counts.
//!
//! Candidates are `1..=k_max` with weight
//! `w(k) = 1/(1 − e(k)) · 1/(1 − d(k))`, where `e` and `d` are the optional
//! error and discard rate models (an absent model contributes a factor of
//! one). Weights are normalized and `n_samples` values are drawn with
//! replacement from an injected generator.
//!
//! The weighting favors the k values whose shots are most often corrupted or
//! discarded, compensating their lower yield of usable shots. A rate of
//! exactly one would make the weight unbounded and is rejected.
use crate::estimation::{
    core::{
        rates::{RateFn, eval_rate},
        validation::validate_k_max,
    },
    errors::{QPEError, QPEResult},
};
use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};

/// Unnormalized sampling weight for every candidate `k = 1..=k_max`.
///
/// Errors
/// ------
/// - `QPEError::InvalidKMax` when `k_max == 0`.
/// - `QPEError::RateOutOfRange` for a rate outside `[0, 1]`.
/// - `QPEError::UnboundedKWeight` for a rate equal to one.
pub fn k_weights(
    k_max: u32, error_rate: Option<RateFn<'_>>, discard_rate: Option<RateFn<'_>>,
) -> QPEResult<Vec<f64>> {
    validate_k_max(k_max)?;
    (1..=k_max)
        .map(|k| {
            let e = eval_rate(error_rate, k)?;
            let d = eval_rate(discard_rate, k)?;
            for rate in [e, d] {
                if rate >= 1.0 {
                    return Err(QPEError::UnboundedKWeight { k, rate });
                }
            }
            Ok(1.0 / (1.0 - e) / (1.0 - d))
        })
        .collect()
}

/// Draw `n_samples` repetition counts from `1..=k_max`.
///
/// Parameters
/// ----------
/// - `k_max`: `u32`
///   Largest candidate (`>= 1`).
/// - `n_samples`: `usize`
///   Number of draws; zero yields an empty vector.
/// - `error_rate`, `discard_rate`: `Option<RateFn>`
///   Optional rate models entering the weights.
/// - `rng`: `&mut R`
///   Source of randomness.
///
/// Errors
/// ------
/// - Everything [`k_weights`] returns.
/// - `QPEError::SamplingFailed` if the weighted sampler cannot be built.
pub fn generate_ks<R: Rng + ?Sized>(
    k_max: u32, n_samples: usize, error_rate: Option<RateFn<'_>>,
    discard_rate: Option<RateFn<'_>>, rng: &mut R,
) -> QPEResult<Vec<u32>> {
    let weights = k_weights(k_max, error_rate, discard_rate)?;
    let sampler = WeightedIndex::new(&weights)
        .map_err(|err| QPEError::SamplingFailed { reason: err.to_string() })?;
    Ok((0..n_samples).map(|_| sampler.sample(rng) as u32 + 1).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Weight formula with and without rate models.
    // - Empirical histogram of draws.
    // - Rejection of k_max = 0 and unbounded weights.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Zero rates give an approximately uniform histogram.
    //
    // Given
    // -----
    // - k_max = 5, n_samples = 10000, error_rate ≡ 0, no discard model.
    //
    // Expect
    // ------
    // - Every k in 1..=5 appears with frequency 0.2 ± 0.02.
    fn zero_rates_sample_uniformly() {
        // Arrange
        let zero = |_: u32| 0.0;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);

        // Act
        let ks = generate_ks(5, 10_000, Some(&zero), None, &mut rng).expect("sampling");

        // Assert
        assert_eq!(ks.len(), 10_000);
        let mut counts = [0usize; 5];
        for k in ks {
            assert!((1..=5).contains(&k));
            counts[(k - 1) as usize] += 1;
        }
        for c in counts {
            assert_relative_eq!(c as f64 / 10_000.0, 0.2, epsilon = 0.02);
        }
    }

    #[test]
    // Purpose
    // -------
    // Weights follow 1/(1 − e) · 1/(1 − d).
    //
    // Given
    // -----
    // - k_max = 3, e(k) = 0.1k, d(k) = 0.5 for every k.
    //
    // Expect
    // ------
    // - Weights [2/0.9, 2/0.8, 2/0.7].
    fn weights_combine_both_models() {
        let error = |k: u32| 0.1 * f64::from(k);
        let discard = |_: u32| 0.5;

        let w = k_weights(3, Some(&error), Some(&discard)).expect("weights");

        for (got, want) in w.iter().zip([2.0 / 0.9, 2.0 / 0.8, 2.0 / 0.7]) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Degenerate designs are rejected.
    //
    // Given
    // -----
    // - k_max = 0; a discard model equal to one at k = 2.
    //
    // Expect
    // ------
    // - `InvalidKMax` and `UnboundedKWeight { k: 2, .. }`.
    fn degenerate_designs_are_rejected() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let discard = |k: u32| if k == 2 { 1.0 } else { 0.0 };

        assert_eq!(
            generate_ks(0, 10, None, None, &mut rng),
            Err(QPEError::InvalidKMax { k_max: 0 })
        );
        assert_eq!(
            generate_ks(3, 10, None, Some(&discard), &mut rng),
            Err(QPEError::UnboundedKWeight { k: 2, rate: 1.0 })
        );
        assert_eq!(generate_ks(3, 0, None, None, &mut rng), Ok(Vec::new()));
    }
}

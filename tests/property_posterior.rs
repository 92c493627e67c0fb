//! Property tests for the posterior update and its circular summary.
//!
//! Purpose
//! -------
//! - Check invariants that must hold for any shot record, grid size and
//!   constant error rate, not just for hand-picked cases.
//!
//! Coverage
//! --------
//! - `estimation::posterior::{update, map_estimate}`.
//! - `estimation::circular::get_mu_and_sigma`.
//! - `estimation::sampling::generate_ks`.
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rust_qpe::estimation::{prelude::*, update};

/// Shot columns `(k, β, m)` with discards mixed in.
fn shot_columns() -> impl Strategy<Value = Vec<(u32, f64, Option<u8>)>> {
    prop::collection::vec(
        (1u32..=16, 0.0f64..2.0, prop::option::weighted(0.9, 0u8..=1)),
        0..60,
    )
}

fn measurement_set(cols: &[(u32, f64, Option<u8>)]) -> MeasurementSet {
    let ks: Vec<u32> = cols.iter().map(|c| c.0).collect();
    let betas: Vec<f64> = cols.iter().map(|c| c.1).collect();
    let ms: Vec<Option<u8>> = cols.iter().map(|c| c.2).collect();
    MeasurementSet::from_columns(&ks, &betas, &ms).expect("valid columns")
}

proptest! {
    #[test]
    fn posterior_is_a_density(
        cols in shot_columns(),
        n in 16usize..=512,
        q in 0.0f64..0.9,
    ) {
        let grid = PhaseGrid::new(n).expect("grid");
        let shots = measurement_set(&cols);
        let rate = move |_: u32| q;

        let posterior = update(&grid, grid.uniform_prior().view(), &shots, Some(&rate))
            .expect("posterior");

        prop_assert_eq!(posterior.len(), n);
        prop_assert!(posterior.iter().all(|&v| v.is_finite() && v >= 0.0));
        let integral = posterior.sum() * grid.dphi();
        prop_assert!((integral - 1.0).abs() < 1e-9, "integral = {}", integral);
    }

    #[test]
    fn summary_lies_on_the_circle(
        cols in shot_columns(),
        n in 16usize..=256,
    ) {
        let grid = PhaseGrid::new(n).expect("grid");
        let shots = measurement_set(&cols);

        let posterior = update(&grid, grid.uniform_prior().view(), &shots, None)
            .expect("posterior");
        let est = get_mu_and_sigma(&grid, posterior.view()).expect("summary");
        let map = map_estimate(&grid, posterior.view()).expect("map");

        prop_assert!((-1.0..=1.0).contains(&est.mu), "mu = {}", est.mu);
        prop_assert!(est.sigma >= 0.0);
        prop_assert!(grid.points().iter().any(|&p| p == map));
    }

    #[test]
    fn generated_ks_stay_in_range(
        k_max in 1u32..=32,
        n_samples in 0usize..200,
        lambda in 0.0f64..0.5,
        seed in any::<u64>(),
    ) {
        let model = DepolarizingRate::new(lambda).expect("valid lambda");
        let rate = model.as_fn();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let ks = generate_ks(k_max, n_samples, Some(&rate), None, &mut rng).expect("design");

        prop_assert_eq!(ks.len(), n_samples);
        prop_assert!(ks.iter().all(|&k| (1..=k_max).contains(&k)));
    }
}

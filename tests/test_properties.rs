//! Property-based tests for bounds, outcome sampling, and histogram statistics.

use proptest::prelude::*;

use task_forecast::simulation::outcome::{lower_bound, sample_outcome, upper_bound};
use task_forecast::simulation::statistics::{extent, median, standard_deviation, value_count};
use task_forecast::simulation::SplitMix64;

/// Strategy: a short histogram with some mass in it.
fn histogram_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0..50u32, 1..64)
}

/// Strategy: confidence fraction in whole percent steps.
fn confidence_strategy() -> impl Strategy<Value = f64> {
    (0..=100u32).prop_map(|p| p as f64 / 100.0)
}

proptest! {
    // 1. Median lies within the occupied extent (or is 0 for an empty histogram)
    #[test]
    fn median_within_extent(h in histogram_strategy()) {
        let m = median(&h);
        match extent(&h) {
            Some((lo, hi)) => {
                prop_assert!(m >= lo as f64 && m <= hi as f64, "median={m} extent=({lo},{hi}) h={h:?}");
            }
            None => prop_assert_eq!(m, 0.0),
        }
    }

    // 2. All mass in one bucket has zero spread and median at that bucket
    #[test]
    fn single_bucket_zero_spread(index in 0..200usize, count in 1..10_000u32) {
        let mut h = vec![0u32; index + 1];
        h[index] = count;
        prop_assert_eq!(standard_deviation(&h), 0.0);
        prop_assert_eq!(median(&h), index as f64);
        prop_assert_eq!(value_count(&h), count as u64);
    }

    // 3. Standard deviation is never negative
    #[test]
    fn std_dev_non_negative(h in histogram_strategy()) {
        prop_assert!(standard_deviation(&h) >= 0.0);
    }

    // 4. Bounds at the calibration points
    #[test]
    fn bounds_calibration(x in 0.0..10_000.0f64) {
        prop_assert_eq!(upper_bound(x, 0.90), x);
        prop_assert_eq!(upper_bound(x, 0.80), 2.0 * x);
        prop_assert_eq!(lower_bound(x, 0.80), x / 2.0);
        prop_assert_eq!(lower_bound(0.0, x / 10_000.0), 0.0);
    }

    // 5. Bounds bracket the estimate and widen as confidence drops
    #[test]
    fn bounds_bracket_estimate(min in 0.0..500.0f64, span in 0.0..500.0f64, c in confidence_strategy()) {
        let max = min + span;
        prop_assert!(upper_bound(max, c) >= max);
        prop_assert!(lower_bound(min, c) <= min);
        prop_assert!(lower_bound(min, c) >= 0.0);
        prop_assert!(upper_bound(max, (c - 0.1).max(0.0)) >= upper_bound(max, c));
    }

    // 6. Full confidence never leaves [min, max]
    #[test]
    fn full_confidence_within(seed in any::<u64>(), min in 0..1000i64, span in 0..1000i64) {
        let mut rng = SplitMix64::new(seed);
        let max = min + span;
        for _ in 0..100 {
            let v = sample_outcome(&mut rng, min as f64, max as f64, 1.0);
            prop_assert!(v >= min && v <= max, "v={v} not in [{min}, {max}]");
        }
    }

    // 7. Any confidence stays within [lower_bound, upper_bound]
    #[test]
    fn outcome_within_bounds(seed in any::<u64>(), min in 0..1000i64, span in 0..1000i64, c in confidence_strategy()) {
        let mut rng = SplitMix64::new(seed);
        let (min, max) = (min as f64, (min + span) as f64);
        let lo = lower_bound(min, c).ceil();
        let hi = upper_bound(max, c).floor();
        for _ in 0..100 {
            let v = sample_outcome(&mut rng, min, max, c) as f64;
            prop_assert!(v >= lo.min(min) && v <= hi, "v={v} not in [{lo}, {hi}]");
        }
    }
}

// 8. Fixed scenarios from the estimation UI's reference data
#[test]
fn reference_histograms() {
    let small = [0, 1, 3, 1];
    assert_eq!(median(&small), 2.0);
    assert_eq!(value_count(&small), 5);

    let bell = [0, 1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1];
    assert_eq!(median(&bell), 6.0);
    assert!((standard_deviation(&bell) - 2.449489743).abs() < 1e-9);
}

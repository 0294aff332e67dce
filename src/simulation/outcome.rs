//! Per-task outcome model: confidence bounds and the three-region mixture draw.
//!
//! For a task estimated as `[min, max]` at confidence `c`:
//!
//! | Region | Probability | Draw |
//! |--------|-------------|------|
//! | within | `c` | uniform in `[min, max]` |
//! | underrun | `0.25 · (1 − c)` | uniform in `[lower_bound(min, c), min]` (0 when `min = 0`) |
//! | overrun | `0.75 · (1 − c)` | uniform in `[max, upper_bound(max, c)]` |
//!
//! The region is picked by one draw on `[0, 1000]`. Low-confidence tasks are
//! three times as likely to overrun as to underrun.

use crate::constants::{
    CONFIDENCE_STEP_PERCENT, FULL_CONFIDENCE_PERCENT, REGION_SCALE, UNDERRUN_SHARE,
};

use super::sampler::RandomSampler;

/// Bound multiplier: 1 at confidence ≥ 0.90, plus one for every 10 points below.
#[inline(always)]
fn bound_multiplier(confidence: f64) -> f64 {
    let missing = FULL_CONFIDENCE_PERCENT - (confidence * 100.0).round();
    (missing / CONFIDENCE_STEP_PERCENT).ceil().max(1.0)
}

/// Worst-case overrun ceiling for a task.
#[inline(always)]
pub fn upper_bound(max: f64, confidence: f64) -> f64 {
    max * bound_multiplier(confidence)
}

/// Underrun floor for a task; shrinks toward zero as confidence drops.
#[inline(always)]
pub fn lower_bound(min: f64, confidence: f64) -> f64 {
    if min == 0.0 {
        return 0.0;
    }
    min / bound_multiplier(confidence)
}

/// Which part of the mixture a draw came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Within,
    Underrun,
    Overrun,
}

/// Map a region draw on `[0, REGION_SCALE]` to a mixture region.
#[inline(always)]
pub fn select_region(draw: i64, confidence: f64) -> Region {
    let scale = REGION_SCALE as f64;
    let within_cut = confidence * scale;
    let underrun_cut = within_cut + UNDERRUN_SHARE * (scale - within_cut);
    let draw = draw as f64;
    if draw <= within_cut {
        Region::Within
    } else if draw <= underrun_cut {
        Region::Underrun
    } else {
        Region::Overrun
    }
}

/// Draw one outcome for one task in one pass, rounded to the nearest integer.
#[inline(always)]
pub fn sample_outcome<S: RandomSampler + ?Sized>(
    sampler: &mut S,
    min: f64,
    max: f64,
    confidence: f64,
) -> i64 {
    let draw = sampler.uniform_int(0.0, REGION_SCALE as f64);
    match select_region(draw, confidence) {
        Region::Within => sampler.uniform_int(min, max),
        Region::Underrun if min == 0.0 => 0,
        Region::Underrun => sampler.uniform_int(lower_bound(min, confidence), min),
        Region::Overrun => sampler.uniform_int(max, upper_bound(max, confidence)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::fast_prng::SplitMix64;

    #[test]
    fn test_upper_bound_steps() {
        assert_eq!(upper_bound(10.0, 1.0), 10.0);
        assert_eq!(upper_bound(10.0, 0.90), 10.0);
        assert_eq!(upper_bound(10.0, 0.89), 20.0);
        assert_eq!(upper_bound(10.0, 0.80), 20.0);
        assert_eq!(upper_bound(10.0, 0.79), 30.0);
        assert_eq!(upper_bound(10.0, 0.0), 100.0);
    }

    #[test]
    fn test_lower_bound_steps() {
        assert_eq!(lower_bound(10.0, 0.95), 10.0);
        assert_eq!(lower_bound(10.0, 0.80), 5.0);
        assert_eq!(lower_bound(12.0, 0.70), 4.0);
        assert_eq!(lower_bound(0.0, 0.10), 0.0);
    }

    #[test]
    fn test_select_region_partitions() {
        // c = 0.5: within ≤ 500, underrun ≤ 625, overrun above
        assert_eq!(select_region(0, 0.5), Region::Within);
        assert_eq!(select_region(500, 0.5), Region::Within);
        assert_eq!(select_region(501, 0.5), Region::Underrun);
        assert_eq!(select_region(625, 0.5), Region::Underrun);
        assert_eq!(select_region(626, 0.5), Region::Overrun);
        assert_eq!(select_region(1000, 0.5), Region::Overrun);
        assert_eq!(select_region(1000, 1.0), Region::Within);
    }

    #[test]
    fn test_full_confidence_stays_within_estimate() {
        let mut rng = SplitMix64::new(42);
        for _ in 0..10_000 {
            let v = sample_outcome(&mut rng, 36.0, 73.0, 1.0);
            assert!((36..=73).contains(&v), "outcome {} outside [36, 73]", v);
        }
    }

    #[test]
    fn test_zero_min_underrun_is_zero() {
        let mut rng = SplitMix64::new(3);
        for _ in 0..10_000 {
            let v = sample_outcome(&mut rng, 0.0, 5.0, 0.0);
            assert!((0..=50).contains(&v), "outcome {} outside [0, 50]", v);
        }
    }

    #[test]
    fn test_outcomes_respect_bounds() {
        let mut rng = SplitMix64::new(11);
        let (min, max, c) = (8.0, 20.0, 0.5);
        let lo = lower_bound(min, c).ceil() as i64;
        let hi = upper_bound(max, c) as i64;
        for _ in 0..10_000 {
            let v = sample_outcome(&mut rng, min, max, c);
            assert!(v >= lo && v <= hi, "outcome {} outside [{}, {}]", v, lo, hi);
        }
    }

    #[test]
    fn test_overruns_outnumber_underruns() {
        let mut rng = SplitMix64::new(5);
        let (mut under, mut over) = (0u32, 0u32);
        for _ in 0..100_000 {
            let v = sample_outcome(&mut rng, 10.0, 20.0, 0.5);
            if v < 10 {
                under += 1;
            } else if v > 20 {
                over += 1;
            }
        }
        // 375 overrun vs 125 underrun slots; draws equal to min or max count as within.
        assert!(over > 2 * under, "over={} under={}", over, under);
    }
}

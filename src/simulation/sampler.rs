//! Uniform integer sampling: the single source of randomness for the engine.
//!
//! The engine is generic over [`RandomSampler`], so runs can use a fresh OS-seeded
//! stream ([`RngSampler::from_entropy`], the default) or a deterministic one
//! ([`RngSampler::seeded`], [`super::fast_prng::SplitMix64`]) for reproducible tests.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform integer draw over an inclusive range.
pub trait RandomSampler {
    /// Draw an integer in `[ceil(min), floor(max)]`, each value equally likely.
    ///
    /// Non-integer bounds narrow the interval. When the narrowed interval is empty
    /// (e.g. `min = 2.3, max = 2.7`) or a bound is NaN, `ceil(min)` is returned.
    fn uniform_int(&mut self, min: f64, max: f64) -> i64;
}

impl<S: RandomSampler + ?Sized> RandomSampler for &mut S {
    #[inline(always)]
    fn uniform_int(&mut self, min: f64, max: f64) -> i64 {
        (**self).uniform_int(min, max)
    }
}

/// Narrowed integer interval for a draw.
pub(crate) enum Interval {
    Range(i64, i64),
    /// Empty or single-valued interval: the draw is fixed.
    Fixed(i64),
}

#[inline(always)]
pub(crate) fn integer_bounds(min: f64, max: f64) -> Interval {
    let lo = min.ceil();
    let hi = max.floor();
    if hi > lo {
        Interval::Range(lo as i64, hi as i64)
    } else {
        Interval::Fixed(lo as i64)
    }
}

/// Adapter from any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSampler<SmallRng> {
    /// Fresh random stream; every run differs.
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_os_rng())
    }

    /// Reproducible stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSampler for RngSampler<R> {
    #[inline(always)]
    fn uniform_int(&mut self, min: f64, max: f64) -> i64 {
        match integer_bounds(min, max) {
            Interval::Range(lo, hi) => self.rng.random_range(lo..=hi),
            Interval::Fixed(value) => value,
        }
    }
}

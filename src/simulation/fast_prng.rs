//! Fast seedable PRNG for reproducible runs: SplitMix64.
//!
//! SplitMix64 has a single u64 state word, so parallel sweeps can give every
//! independent run its own stream for 8 bytes of state. Bounded draws use
//! multiply-high instead of modulo: `(r * n) >> 64` maps a full 64-bit word onto
//! `[0, n)` with bias at most `n / 2^64`, negligible for simulation.

use super::sampler::{integer_bounds, Interval, RandomSampler};

/// SplitMix64 stream; cheap to clone and to seed per run.
#[derive(Clone, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Stream starting at `seed`; equal seeds give equal streams.
    #[inline(always)]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance the state and mix it into the next output word.
    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, n)`; `n = 0` yields 0.
    #[inline(always)]
    pub fn next_below(&mut self, n: u64) -> u64 {
        ((self.next_u64() as u128 * n as u128) >> 64) as u64
    }
}

impl RandomSampler for SplitMix64 {
    #[inline(always)]
    fn uniform_int(&mut self, min: f64, max: f64) -> i64 {
        match integer_bounds(min, max) {
            Interval::Range(lo, hi) => {
                let span = hi.wrapping_sub(lo) as u64 + 1;
                lo.wrapping_add(self.next_below(span) as i64)
            }
            Interval::Fixed(value) => value,
        }
    }
}

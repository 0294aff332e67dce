//! Distribution statistics computed directly on frequency-compressed histograms.
//!
//! A histogram stores `h[v]` = number of passes whose outcome was `v`, so every
//! statistic here is a frequency-weighted sum over indices; nothing is expanded
//! back into individual samples.
//!
//! - [`value_count`], [`mean`], [`median`], [`standard_deviation`]: summary statistics
//! - [`kernel_density_estimate`]: Gaussian-smoothed overlay for frequency charts
//! - [`summarize`]: builds a [`ResultSummary`] (median ± one standard deviation)

use serde::Serialize;

use crate::constants::{KDE_BANDWIDTH_FRACTION, KDE_MAX_SAMPLES, KDE_MIN_BANDWIDTH};
use crate::types::{Histogram, ResultSummary};

/// Kernel terms further than this many bandwidths from a sample point are skipped
/// (`exp(-32)` is below 1e-13).
const KDE_WINDOW_BANDWIDTHS: f64 = 8.0;

/// Total number of recorded values.
pub fn value_count(histogram: &[u32]) -> u64 {
    histogram.iter().map(|&f| f as u64).sum()
}

/// First and last index with a nonzero frequency.
pub fn extent(histogram: &[u32]) -> Option<(usize, usize)> {
    let first = histogram.iter().position(|&f| f > 0)?;
    let last = histogram.iter().rposition(|&f| f > 0)?;
    Some((first, last))
}

/// Frequency-weighted mean; 0 for an empty histogram.
pub fn mean(histogram: &[u32]) -> f64 {
    let n = value_count(histogram);
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &f)| i as f64 * f as f64)
        .sum();
    sum / n as f64
}

/// Weighted median.
///
/// Walks the histogram until the cumulative frequency passes half the count. When
/// it lands exactly on half at index `i`, the median sits midway between `i` and
/// the next occupied index: `i + zeros/2 + 0.5`, where `zeros` is the run of empty
/// buckets after `i`. An empty histogram has median 0.
pub fn median(histogram: &[u32]) -> f64 {
    let n = value_count(histogram);
    if n == 0 {
        return 0.0;
    }

    let mut cumulative = 0u64;
    for (i, &f) in histogram.iter().enumerate() {
        cumulative += f as u64;
        if 2 * cumulative > n {
            return i as f64;
        }
        if 2 * cumulative == n {
            let zeros = histogram[i + 1..].iter().take_while(|&&f| f == 0).count();
            return i as f64 + zeros as f64 / 2.0 + 0.5;
        }
    }
    // Unreachable for n > 0: the walk always passes half the total.
    (histogram.len() - 1) as f64
}

/// Frequency-weighted sample standard deviation (divisor `N - 1`); 0 when `N ≤ 1`.
pub fn standard_deviation(histogram: &[u32]) -> f64 {
    let n = value_count(histogram);
    if n <= 1 {
        return 0.0;
    }
    let mean = mean(histogram);
    let squared: f64 = histogram
        .iter()
        .enumerate()
        .filter(|(_, &f)| f > 0)
        .map(|(i, &f)| f as f64 * (i as f64 - mean).powi(2))
        .sum();
    (squared / (n - 1) as f64).sqrt()
}

/// One point of a density overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// Gaussian kernel density estimate over `[min_index, max_index]`.
///
/// Produces at most [`KDE_MAX_SAMPLES`] evenly spaced points with bandwidth
/// `max(range · 0.02, 1)`. Densities are rescaled so the peak equals the
/// histogram's highest frequency, for overlay on a frequency-scaled chart.
/// Returns an empty vector when `max_index < min_index`.
pub fn kernel_density_estimate(
    histogram: &[u32],
    min_index: usize,
    max_index: usize,
) -> Vec<DensityPoint> {
    if max_index < min_index {
        return Vec::new();
    }
    let range = (max_index - min_index) as f64;
    let samples = (max_index - min_index + 1).min(KDE_MAX_SAMPLES);
    let step = if samples > 1 {
        range / (samples - 1) as f64
    } else {
        0.0
    };
    let bandwidth = (range * KDE_BANDWIDTH_FRACTION).max(KDE_MIN_BANDWIDTH);
    let window = KDE_WINDOW_BANDWIDTHS * bandwidth;

    let mut points: Vec<DensityPoint> = (0..samples)
        .map(|s| {
            let x = min_index as f64 + s as f64 * step;
            let lo = (x - window).max(0.0).floor() as usize;
            let hi = ((x + window).ceil() as usize).min(histogram.len().saturating_sub(1));
            let mut density = 0.0;
            for i in lo..=hi.max(lo) {
                let f = match histogram.get(i) {
                    Some(&f) if f > 0 => f as f64,
                    _ => continue,
                };
                let z = (x - i as f64) / bandwidth;
                density += f * (-0.5 * z * z).exp();
            }
            DensityPoint { x, density }
        })
        .collect();

    let peak_density = points.iter().map(|p| p.density).fold(0.0, f64::max);
    let peak_frequency = histogram.iter().copied().max().unwrap_or(0) as f64;
    if peak_density > 0.0 {
        let scale = peak_frequency / peak_density;
        for p in &mut points {
            p.density *= scale;
        }
    }
    points
}

/// Build a summary from a histogram, taking min/max from its occupied extent.
pub fn summarize(histogram: Histogram) -> ResultSummary {
    let (min, max) = extent(&histogram).unwrap_or((0, 0));
    summarize_with_bounds(histogram, min as f64, max as f64)
}

/// Build a summary with externally tracked min/max (the engine's running extremes).
pub fn summarize_with_bounds(histogram: Histogram, min: f64, max: f64) -> ResultSummary {
    let median = median(&histogram);
    let std_dev = standard_deviation(&histogram);
    ResultSummary {
        min,
        max,
        median,
        std_dev,
        likely_min: (median - std_dev).round(),
        likely_max: (median + std_dev).round(),
        histogram,
    }
}

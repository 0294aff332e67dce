//! Calibration constants for the outcome model, histogram statistics, and engine defaults.
//!
//! The outcome model's region split and the bound multiplier step are product
//! calibration values: estimators tend to underestimate, so three quarters of the
//! mass outside the stated confidence is placed above `max`.

/// Integer domain the region-selection draw is scaled to: [0, REGION_SCALE].
pub const REGION_SCALE: i64 = 1000;

/// Share of the out-of-confidence mass assigned to underruns (the rest overruns).
pub const UNDERRUN_SHARE: f64 = 0.25;

/// Confidence at or above which bounds are not expanded (in whole percent).
pub const FULL_CONFIDENCE_PERCENT: f64 = 100.0;

/// Each drop of this many confidence points adds one multiple of `max` to the overrun ceiling.
pub const CONFIDENCE_STEP_PERCENT: f64 = 10.0;

/// Maximum number of sample points produced by the kernel density estimate.
pub const KDE_MAX_SAMPLES: usize = 200;

/// Kernel bandwidth as a fraction of the sampled range (floored at [`KDE_MIN_BANDWIDTH`]).
pub const KDE_BANDWIDTH_FRACTION: f64 = 0.02;

/// Smallest kernel bandwidth, in outcome units.
pub const KDE_MIN_BANDWIDTH: f64 = 1.0;

/// Default number of simulated passes.
pub const DEFAULT_PASSES: usize = 10_000;

/// Default number of passes between progress reports in batched mode.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Default cost multiplier: one hour per time unit.
pub const DEFAULT_HOURS_PER_TIME_UNIT: f64 = 1.0;

/// Default ceiling on the total number of histogram buckets allocated for one run.
///
/// Counts are `u32`, so 64M buckets is 256 MB across all time/cost/per-task histograms.
pub const DEFAULT_MAX_BUCKETS: usize = 64 * 1024 * 1024;

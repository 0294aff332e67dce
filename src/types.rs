//! Core data structures: task estimates, run configuration, and simulation results.
//!
//! [`Task`] is owned by the caller and only borrowed by the engine. Everything the
//! engine hands back ([`SimulationRun`], [`Progress`]) is owned by the caller once
//! returned; the engine keeps no references after completion.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HOURS_PER_TIME_UNIT, DEFAULT_MAX_BUCKETS, DEFAULT_PASSES, FULL_CONFIDENCE_PERCENT,
};
use crate::error::{Result, SimulationError};

/// Frequency-compressed distribution: index = outcome value, value = occurrence count.
pub type Histogram = Vec<u32>;

// ── Input ───────────────────────────────────────────────────────────

/// One uncertain task estimate.
///
/// `confidence` is the estimator's probability (0..=1) that the real outcome
/// lands in `[min, max]`. Use [`confidence_from_percent`] for percent inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub confidence: f64,
    #[serde(default)]
    pub hourly_cost: f64,
}

impl Task {
    pub fn new(id: impl Into<String>, min: f64, max: f64, confidence: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            min,
            max,
            confidence,
            hourly_cost: 0.0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_hourly_cost(mut self, hourly_cost: f64) -> Self {
        self.hourly_cost = hourly_cost;
        self
    }

    /// Upstream input check. The engine itself never calls this: invalid numbers
    /// fed straight into a run produce meaningless statistics instead of an error.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| SimulationError::InvalidTask {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if !self.min.is_finite() || self.min < 0.0 {
            return Err(invalid("min must be a non-negative number"));
        }
        if !self.max.is_finite() || self.max < self.min {
            return Err(invalid("max must be a number no smaller than min"));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(invalid("confidence must be within [0, 1]"));
        }
        if !self.hourly_cost.is_finite() || self.hourly_cost < 0.0 {
            return Err(invalid("hourly cost must be a non-negative number"));
        }
        Ok(())
    }
}

/// Validate a whole task list, including id uniqueness.
pub fn validate_tasks(tasks: &[Task]) -> Result<()> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        task.validate()?;
        if !seen.insert(task.id.as_str()) {
            return Err(SimulationError::InvalidTask {
                id: task.id.clone(),
                reason: "duplicate task id".to_string(),
            });
        }
    }
    Ok(())
}

/// Normalize a 0-100 percent confidence to the 0-1 fraction the engine expects.
pub fn confidence_from_percent(percent: f64) -> f64 {
    percent / FULL_CONFIDENCE_PERCENT
}

// ── Configuration ───────────────────────────────────────────────────

/// Explicit run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub passes: usize,
    /// Hours represented by one time unit; scales `hourly_cost` into cost per unit.
    pub hours_per_time_unit: f64,
    /// Ceiling on the total bucket count across all histograms of one run.
    pub max_buckets: usize,
    /// Keep every pass's [`RunTotals`] in the result for drill-down.
    pub record_passes: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            passes: DEFAULT_PASSES,
            hours_per_time_unit: DEFAULT_HOURS_PER_TIME_UNIT,
            max_buckets: DEFAULT_MAX_BUCKETS,
            record_passes: false,
        }
    }
}

impl SimulationConfig {
    pub fn with_passes(passes: usize) -> Self {
        Self {
            passes,
            ..Self::default()
        }
    }
}

// ── Results ─────────────────────────────────────────────────────────

/// Read-only statistics over one histogram. Always rebuilt, never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub std_dev: f64,
    /// `median - std_dev`, rounded.
    pub likely_min: f64,
    /// `median + std_dev`, rounded.
    pub likely_max: f64,
    pub histogram: Histogram,
}

/// Time and cost summaries for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    pub id: String,
    pub name: String,
    pub times: ResultSummary,
    pub costs: ResultSummary,
}

/// One task's outcome within a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskOutcome {
    pub time: i64,
    pub cost: f64,
}

/// Per-pass scratch totals; recorded only when [`SimulationConfig::record_passes`] is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunTotals {
    pub time: f64,
    pub cost: f64,
    /// Indexed like the input task slice.
    pub tasks: Vec<TaskOutcome>,
}

impl RunTotals {
    pub(crate) fn reset(&mut self) {
        self.time = 0.0;
        self.cost = 0.0;
        self.tasks.clear();
    }
}

/// Final result of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    pub passes: usize,
    pub hours_per_time_unit: f64,
    pub times: ResultSummary,
    pub costs: ResultSummary,
    /// In input order; look up by id with [`SimulationRun::task`].
    pub tasks: Vec<TaskResult>,
    pub elapsed: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_passes: Option<Vec<RunTotals>>,
}

impl SimulationRun {
    pub fn task(&self, id: &str) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Interim snapshot handed to progress callbacks after each batch.
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub processed_passes: usize,
    pub total_passes: usize,
    pub has_more_batches: bool,
    pub times: ResultSummary,
    pub costs: ResultSummary,
}

//! Simulation engine: draws one outcome per task per pass and accumulates histograms.
//!
//! The engine is an explicit step machine so any host scheduler can drive it:
//!
//! 1. **Sizing**: [`SimulationEngine::new`] derives histogram capacities from
//!    [`upper_bound`] and allocates zero-filled buffers that are never resized.
//! 2. **Iterating**: [`SimulationEngine::run_batch`] runs up to `n` passes;
//!    [`SimulationEngine::progress`] builds an interim snapshot between batches.
//! 3. **Compiling**: [`SimulationEngine::finish`] runs any remaining passes and
//!    turns every histogram into a [`ResultSummary`].
//!
//! Passes run strictly in order on the calling thread; the engine owns all of its
//! histograms, so independent engines can run concurrently without sharing state.

use std::time::Instant;

use crate::error::{Result, SimulationError};
use crate::types::{
    Histogram, Progress, ResultSummary, RunTotals, SimulationConfig, SimulationRun, Task,
    TaskOutcome, TaskResult,
};

use super::outcome::{sample_outcome, upper_bound};
use super::sampler::RandomSampler;
use super::statistics::summarize_with_bounds;

/// Every pass may land in the same bucket, and buckets are `u32` counters.
pub const MAX_PASSES: usize = u32::MAX as usize;

// ── Sizing ──────────────────────────────────────────────────────────

/// Largest possible outcome (histogram length − 1) for every histogram of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramCapacity {
    pub time: usize,
    pub cost: usize,
    /// `(time, cost)` per task, in input order.
    pub per_task: Vec<(usize, usize)>,
}

impl HistogramCapacity {
    /// Total number of buckets the run will allocate.
    pub fn total_buckets(&self) -> usize {
        self.per_task
            .iter()
            .fold(self.time.saturating_add(self.cost).saturating_add(2), |acc, &(t, c)| {
                acc.saturating_add(t).saturating_add(c).saturating_add(2)
            })
    }
}

/// `ceil(bound)` as an index; NaN and negative bounds map to 0.
#[inline(always)]
fn bound_to_index(bound: f64) -> usize {
    bound.ceil() as usize
}

/// Histogram capacities for a task list: time capacity is `ceil(Σ upper_bound)`,
/// cost capacity scales each task's ceiling by its hourly cost and `hours_per_time_unit`.
pub fn size_histograms(tasks: &[Task], hours_per_time_unit: f64) -> HistogramCapacity {
    let mut time_total = 0.0;
    let mut cost_total = 0.0;
    let per_task = tasks
        .iter()
        .map(|task| {
            let time_ceiling = upper_bound(task.max, task.confidence);
            let cost_ceiling = time_ceiling * task.hourly_cost * hours_per_time_unit;
            time_total += time_ceiling;
            cost_total += cost_ceiling;
            (bound_to_index(time_ceiling), bound_to_index(cost_ceiling))
        })
        .collect();
    HistogramCapacity {
        time: bound_to_index(time_total),
        cost: bound_to_index(cost_total),
        per_task,
    }
}

// ── Accumulation ────────────────────────────────────────────────────

/// One histogram plus the running extremes of what was recorded into it.
#[derive(Debug, Clone)]
struct Accumulator {
    histogram: Histogram,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new(capacity: usize) -> Self {
        Self {
            histogram: vec![0; capacity + 1],
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Count `value` in its rounded bucket. Values beyond the sized capacity only
    /// arise from invalid input and are clamped into the last bucket.
    #[inline(always)]
    fn record(&mut self, value: f64) {
        let bucket = value.round();
        let index = (bucket as usize).min(self.histogram.len() - 1);
        self.histogram[index] += 1;
        self.min = self.min.min(bucket);
        self.max = self.max.max(bucket);
    }

    fn bounds(&self) -> (f64, f64) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (0.0, 0.0)
        }
    }

    fn summary(&self) -> ResultSummary {
        let (min, max) = self.bounds();
        summarize_with_bounds(self.histogram.clone(), min, max)
    }

    fn into_summary(self) -> ResultSummary {
        let (min, max) = self.bounds();
        summarize_with_bounds(self.histogram, min, max)
    }
}

// ── Engine ──────────────────────────────────────────────────────────

/// Monte Carlo engine over a borrowed task list.
pub struct SimulationEngine<'a, S> {
    tasks: &'a [Task],
    sampler: S,
    hours_per_time_unit: f64,
    total_passes: usize,
    processed: usize,
    times: Accumulator,
    costs: Accumulator,
    task_times: Vec<Accumulator>,
    task_costs: Vec<Accumulator>,
    totals: RunTotals,
    raw_passes: Option<Vec<RunTotals>>,
    started: Instant,
}

impl<'a, S: RandomSampler> SimulationEngine<'a, S> {
    /// Size and allocate all histograms for a run.
    ///
    /// Fails with [`SimulationError::CapacityExceeded`] when the histograms would
    /// need more than `config.max_buckets` buckets in total, and with
    /// [`SimulationError::TooManyPasses`] when a single bucket could overflow.
    pub fn new(tasks: &'a [Task], config: &SimulationConfig, sampler: S) -> Result<Self> {
        if config.passes > MAX_PASSES {
            return Err(SimulationError::TooManyPasses {
                passes: config.passes,
                limit: MAX_PASSES,
            });
        }
        let capacity = size_histograms(tasks, config.hours_per_time_unit);
        let required = capacity.total_buckets();
        if required > config.max_buckets {
            return Err(SimulationError::CapacityExceeded {
                required,
                limit: config.max_buckets,
            });
        }
        tracing::debug!(
            tasks = tasks.len(),
            passes = config.passes,
            time_capacity = capacity.time,
            cost_capacity = capacity.cost,
            buckets = required,
            "Sized histograms"
        );

        Ok(Self {
            tasks,
            sampler,
            hours_per_time_unit: config.hours_per_time_unit,
            total_passes: config.passes,
            processed: 0,
            times: Accumulator::new(capacity.time),
            costs: Accumulator::new(capacity.cost),
            task_times: capacity
                .per_task
                .iter()
                .map(|&(t, _)| Accumulator::new(t))
                .collect(),
            task_costs: capacity
                .per_task
                .iter()
                .map(|&(_, c)| Accumulator::new(c))
                .collect(),
            totals: RunTotals {
                tasks: Vec::with_capacity(tasks.len()),
                ..RunTotals::default()
            },
            raw_passes: config
                .record_passes
                .then(|| Vec::with_capacity(config.passes)),
            started: Instant::now(),
        })
    }

    pub fn total_passes(&self) -> usize {
        self.total_passes
    }

    pub fn processed_passes(&self) -> usize {
        self.processed
    }

    pub fn is_done(&self) -> bool {
        self.processed >= self.total_passes
    }

    /// One pass: one outcome per task, summed into the run totals.
    fn run_pass(&mut self) {
        let tasks = self.tasks;
        self.totals.reset();

        for (i, task) in tasks.iter().enumerate() {
            let time = sample_outcome(&mut self.sampler, task.min, task.max, task.confidence);
            let cost = time as f64 * task.hourly_cost * self.hours_per_time_unit;
            self.task_times[i].record(time as f64);
            self.task_costs[i].record(cost);
            self.totals.time += time as f64;
            self.totals.cost += cost;
            self.totals.tasks.push(TaskOutcome { time, cost });
        }

        self.times.record(self.totals.time);
        self.costs.record(self.totals.cost);
        if let Some(raw) = self.raw_passes.as_mut() {
            raw.push(self.totals.clone());
        }
        self.processed += 1;
    }

    /// Run up to `batch_size` passes (fewer on the last batch). Returns passes run.
    pub fn run_batch(&mut self, batch_size: usize) -> usize {
        let n = batch_size.min(self.total_passes - self.processed);
        for _ in 0..n {
            self.run_pass();
        }
        n
    }

    /// Interim snapshot of the total time and cost histograms so far.
    pub fn progress(&self) -> Progress {
        Progress {
            processed_passes: self.processed,
            total_passes: self.total_passes,
            has_more_batches: !self.is_done(),
            times: self.times.summary(),
            costs: self.costs.summary(),
        }
    }

    /// Complete any remaining passes and compile the final result.
    pub fn finish(mut self) -> SimulationRun {
        let remaining = self.total_passes - self.processed;
        self.run_batch(remaining);

        let tasks = self
            .tasks
            .iter()
            .zip(self.task_times)
            .zip(self.task_costs)
            .map(|((task, times), costs)| TaskResult {
                id: task.id.clone(),
                name: task.name.clone(),
                times: times.into_summary(),
                costs: costs.into_summary(),
            })
            .collect();

        let run = SimulationRun {
            passes: self.processed,
            hours_per_time_unit: self.hours_per_time_unit,
            times: self.times.into_summary(),
            costs: self.costs.into_summary(),
            tasks,
            elapsed: self.started.elapsed(),
            raw_passes: self.raw_passes,
        };
        tracing::info!(
            passes = run.passes,
            elapsed_ms = run.elapsed.as_secs_f64() * 1000.0,
            time_median = run.times.median,
            cost_median = run.costs.median,
            "Simulation complete"
        );
        run
    }
}

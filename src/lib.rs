//! # task-forecast: Monte Carlo estimation for uncertain task lists
//!
//! Estimates how long and how expensive a list of tasks will be by simulating
//! thousands of passes. Each pass draws one outcome per task, sums them, and
//! counts the totals into integer-indexed histograms; statistics are then read
//! straight off the histograms.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Sample | [`simulation::sampler`], [`simulation::fast_prng`] | Uniform integer draws; injectable, optionally seeded |
//! | Model | [`simulation::outcome`] | Within / underrun / overrun mixture per task, bounded by confidence |
//! | Size | [`simulation::engine::size_histograms`] | Histogram capacity from the overrun ceilings, allocated once |
//! | Iterate | [`simulation::engine`] | N passes, batch-steppable, one histogram per total and per task |
//! | Summarize | [`simulation::statistics`] | Median, standard deviation, likely range, density overlay |
//!
//! ## Execution modes
//!
//! - [`simulation::run_simulation`]: all passes in one call.
//! - [`simulation::run_simulation_progressive`]: batches with an awaited progress
//!   callback and a cooperative yield between batches.
//! - [`simulation::SimulationEngine::run_batch`]: step function for callers that
//!   drive the engine from their own scheduler.
//!
//! ## Histograms
//!
//! A histogram `h` holds `h[v]` = number of passes with outcome `v`. Its length is
//! fixed at sizing time to `ceil(Σ upper_bound) + 1`, so the hot loop never
//! reallocates. Input is trusted: invalid task numbers yield meaningless
//! statistics rather than errors, and [`types::validate_tasks`] is provided for
//! callers to check input upstream.

pub mod constants;
pub mod env_config;
pub mod error;
pub mod server;
pub mod simulation;
pub mod types;

pub use error::{Result, SimulationError};
pub use types::{
    Histogram, Progress, ResultSummary, RunTotals, SimulationConfig, SimulationRun, Task,
    TaskResult,
};

//! Convergence sweep: independent runs over a grid of pass counts, in parallel.
//!
//! Each grid point is a complete, self-contained run with its own SplitMix64
//! stream (`seed + index`) and its own histograms, so rayon workers share nothing
//! but the borrowed task list. Comparing medians and spreads across the grid
//! shows how many passes a task list needs before the estimate settles.

use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::error::Result;
use crate::types::{SimulationConfig, Task};

use super::fast_prng::SplitMix64;
use super::runner::run_simulation_with;

/// Summary of one run in a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub passes: usize,
    pub seed: u64,
    pub time_median: f64,
    pub time_std_dev: f64,
    pub cost_median: f64,
    pub cost_std_dev: f64,
    pub elapsed_ms: f64,
}

/// Default grid: one decade per step.
pub fn default_pass_grid() -> Vec<usize> {
    vec![100, 1_000, 10_000, 100_000]
}

/// Parse a comma-separated grid such as `"500,5000,50000"`.
/// Returns None if any entry is not a positive integer.
pub fn parse_pass_grid(grid: &str) -> Option<Vec<usize>> {
    grid.split(',')
        .map(|s| s.trim().parse::<usize>().ok().filter(|&n| n > 0))
        .collect()
}

/// Run one simulation per pass count in parallel. Results keep grid order.
pub fn convergence_sweep(
    tasks: &[Task],
    pass_counts: &[usize],
    config: &SimulationConfig,
    seed: u64,
) -> Result<Vec<SweepPoint>> {
    let t0 = Instant::now();
    let points = pass_counts
        .par_iter()
        .enumerate()
        .map(|(i, &passes)| {
            let run_seed = seed.wrapping_add(i as u64);
            let run_config = SimulationConfig {
                passes,
                record_passes: false,
                ..config.clone()
            };
            let run = run_simulation_with(tasks, &run_config, SplitMix64::new(run_seed))?;
            Ok(SweepPoint {
                passes,
                seed: run_seed,
                time_median: run.times.median,
                time_std_dev: run.times.std_dev,
                cost_median: run.costs.median,
                cost_std_dev: run.costs.std_dev,
                elapsed_ms: run.elapsed.as_secs_f64() * 1000.0,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        runs = points.len(),
        elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
        "Convergence sweep complete"
    );
    Ok(points)
}

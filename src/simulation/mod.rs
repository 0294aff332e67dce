//! Monte Carlo simulation and histogram statistics.
//!
//! - [`sampler`]: `RandomSampler` trait and the `rand` adapter
//! - [`fast_prng`]: Seedable SplitMix64 sampler for reproducible runs
//! - [`outcome`]: Confidence bounds and the per-task mixture draw
//! - [`statistics`]: Median, standard deviation, and density on histograms
//! - [`engine`]: Histogram sizing and the batch-steppable engine
//! - [`runner`]: Synchronous and progressive entry points
//! - [`sweep`]: Parallel convergence sweeps over pass counts
//! - [`report`]: JSON task loading and result saving

pub mod cancel;
pub mod engine;
pub mod fast_prng;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod sampler;
pub mod statistics;
pub mod sweep;

// Re-export commonly used items
pub use cancel::CancellationToken;
pub use engine::{size_histograms, HistogramCapacity, SimulationEngine, MAX_PASSES};
pub use fast_prng::SplitMix64;
pub use outcome::{lower_bound, sample_outcome, upper_bound};
pub use report::{load_tasks, save_json};
pub use runner::{
    run_progressive_with, run_simulation, run_simulation_progressive, run_simulation_with,
};
pub use sampler::{RandomSampler, RngSampler};
pub use statistics::{
    kernel_density_estimate, median, standard_deviation, summarize, value_count, DensityPoint,
};
pub use sweep::{convergence_sweep, default_pass_grid, parse_pass_grid, SweepPoint};

//! Entry points: one-shot synchronous runs and progressive batched runs.
//!
//! [`run_simulation`] executes every pass in one uninterrupted call, suitable for
//! headless use. [`run_simulation_progressive`] runs passes in batches; after each
//! batch it awaits the progress callback and then yields to the async scheduler,
//! so the host is never blocked for longer than one batch.

use std::future::Future;

use crate::error::{BoxError, Result, SimulationError};
use crate::types::{Progress, SimulationConfig, SimulationRun, Task};

use super::cancel::CancellationToken;
use super::engine::SimulationEngine;
use super::sampler::{RandomSampler, RngSampler};

/// Run `passes` passes synchronously with a fresh random stream.
pub fn run_simulation(
    passes: usize,
    tasks: &[Task],
    hours_per_time_unit: f64,
) -> Result<SimulationRun> {
    let config = SimulationConfig {
        passes,
        hours_per_time_unit,
        ..SimulationConfig::default()
    };
    run_simulation_with(tasks, &config, RngSampler::from_entropy())
}

/// Run synchronously with an explicit configuration and sampler.
pub fn run_simulation_with<S: RandomSampler>(
    tasks: &[Task],
    config: &SimulationConfig,
    sampler: S,
) -> Result<SimulationRun> {
    let engine = SimulationEngine::new(tasks, config, sampler)?;
    Ok(engine.finish())
}

/// Run in batches of `progress_interval` passes with a fresh random stream.
///
/// `on_progress` is awaited after every batch, including the final one (where
/// `has_more_batches` is false). An error from the callback aborts the run.
pub async fn run_simulation_progressive<F, Fut, E>(
    passes: usize,
    tasks: &[Task],
    on_progress: F,
    progress_interval: usize,
    hours_per_time_unit: f64,
) -> Result<SimulationRun>
where
    F: FnMut(Progress) -> Fut,
    Fut: Future<Output = std::result::Result<(), E>>,
    E: Into<BoxError>,
{
    let config = SimulationConfig {
        passes,
        hours_per_time_unit,
        ..SimulationConfig::default()
    };
    run_progressive_with(
        tasks,
        &config,
        RngSampler::from_entropy(),
        progress_interval,
        &CancellationToken::new(),
        on_progress,
    )
    .await
}

/// Progressive run with an explicit configuration, sampler, and cancellation token.
///
/// The token is checked before every batch; once cancelled the run ends with
/// [`SimulationError::Cancelled`] and no partial result.
pub async fn run_progressive_with<S, F, Fut, E>(
    tasks: &[Task],
    config: &SimulationConfig,
    sampler: S,
    progress_interval: usize,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<SimulationRun>
where
    S: RandomSampler,
    F: FnMut(Progress) -> Fut,
    Fut: Future<Output = std::result::Result<(), E>>,
    E: Into<BoxError>,
{
    if progress_interval == 0 {
        return Err(SimulationError::InvalidBatchSize);
    }
    let mut engine = SimulationEngine::new(tasks, config, sampler)?;

    loop {
        if cancel.is_cancelled() {
            tracing::info!(processed = engine.processed_passes(), "Simulation cancelled");
            return Err(SimulationError::Cancelled {
                processed: engine.processed_passes(),
            });
        }

        engine.run_batch(progress_interval);
        let progress = engine.progress();
        tracing::trace!(
            processed = progress.processed_passes,
            total = progress.total_passes,
            "Batch complete"
        );
        on_progress(progress)
            .await
            .map_err(|e| SimulationError::Progress(e.into()))?;

        if engine.is_done() {
            break;
        }
        tokio::task::yield_now().await;
    }

    Ok(engine.finish())
}

//! Shared environment configuration for the forecast binaries.
//!
//! Consolidates `RUST_LOG`, `RAYON_NUM_THREADS`, `FORECAST_PORT`, and
//! `FORECAST_MAX_BUCKETS` reads shared by both binaries.

use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_MAX_BUCKETS;

/// Install the global tracing subscriber, filtered by `RUST_LOG` (default `info`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Read `RAYON_NUM_THREADS` (default 8) and build the rayon global pool.
/// Tolerates an already-initialized pool. Returns thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        tracing::debug!("Rayon global pool already initialized");
    }
    tracing::info!(threads = num_threads, "Rayon threads");
    num_threads
}

/// Read `FORECAST_PORT` (default 9000).
pub fn server_port() -> u16 {
    std::env::var("FORECAST_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9000)
}

/// Read `FORECAST_MAX_BUCKETS` (default [`DEFAULT_MAX_BUCKETS`]).
pub fn max_buckets() -> usize {
    std::env::var("FORECAST_MAX_BUCKETS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_BUCKETS)
}

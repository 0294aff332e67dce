//! Axum HTTP server: stateless simulation endpoints.
//!
//! Each request carries its own task list; runs never share state. Input is
//! validated here before it reaches the engine, which trusts its input.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/simulate` | Run a simulation, return time/cost/per-task summaries |

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::constants::{DEFAULT_HOURS_PER_TIME_UNIT, DEFAULT_MAX_BUCKETS, DEFAULT_PASSES};
use crate::error::SimulationError;
use crate::simulation::{
    kernel_density_estimate, run_simulation_with, RngSampler, SplitMix64,
};
use crate::types::{
    confidence_from_percent, validate_tasks, ResultSummary, SimulationConfig, SimulationRun, Task,
};

/// Upper limit on passes per request.
pub const MAX_API_PASSES: usize = 1_000_000;

/// Server-wide settings shared across handlers.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub max_buckets: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_buckets: DEFAULT_MAX_BUCKETS,
        }
    }
}

pub type AppState = Arc<ServerConfig>;

pub fn create_router(config: ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/simulate", post(handle_simulate))
        .layer(cors)
        .with_state(Arc::new(config))
}

// ── Request/Response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct TaskInput {
    id: String,
    #[serde(default)]
    name: Option<String>,
    min: f64,
    max: f64,
    /// Percent, 0-100.
    confidence: f64,
    #[serde(default)]
    hourly_cost: f64,
}

impl From<TaskInput> for Task {
    fn from(input: TaskInput) -> Self {
        let name = input.name.unwrap_or_else(|| input.id.clone());
        Task::new(input.id, input.min, input.max, confidence_from_percent(input.confidence))
            .with_name(name)
            .with_hourly_cost(input.hourly_cost)
    }
}

#[derive(Deserialize)]
struct SimulateRequest {
    #[serde(default)]
    passes: Option<usize>,
    #[serde(default)]
    hours_per_time_unit: Option<f64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    include_histograms: bool,
    tasks: Vec<TaskInput>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, msg: &str) -> ApiError {
    (status, Json(serde_json::json!({ "error": msg })))
}

fn summary_json(summary: &ResultSummary, include_histogram: bool) -> serde_json::Value {
    let mut json = serde_json::json!({
        "min": summary.min,
        "max": summary.max,
        "median": summary.median,
        "std_dev": summary.std_dev,
        "likely_min": summary.likely_min,
        "likely_max": summary.likely_max,
    });
    if include_histogram {
        json["histogram"] = serde_json::json!(summary.histogram);
    }
    json
}

fn run_json(run: &SimulationRun, include_histograms: bool) -> serde_json::Value {
    let tasks: Vec<serde_json::Value> = run
        .tasks
        .iter()
        .map(|t| {
            serde_json::json!({
                "id": t.id,
                "name": t.name,
                "times": summary_json(&t.times, include_histograms),
                "costs": summary_json(&t.costs, include_histograms),
            })
        })
        .collect();

    let density = kernel_density_estimate(
        &run.times.histogram,
        run.times.min as usize,
        run.times.max as usize,
    );

    serde_json::json!({
        "passes": run.passes,
        "hours_per_time_unit": run.hours_per_time_unit,
        "elapsed_ms": run.elapsed.as_secs_f64() * 1000.0,
        "times": summary_json(&run.times, include_histograms),
        "costs": summary_json(&run.costs, include_histograms),
        "tasks": tasks,
        "time_density": density,
    })
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

// ── POST handler ────────────────────────────────────────────────────

async fn handle_simulate(
    State(config): State<AppState>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let passes = req.passes.unwrap_or(DEFAULT_PASSES);
    if passes == 0 || passes > MAX_API_PASSES {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            &format!("passes must be between 1 and {}", MAX_API_PASSES),
        ));
    }
    let hours_per_time_unit = req
        .hours_per_time_unit
        .unwrap_or(DEFAULT_HOURS_PER_TIME_UNIT);
    if !hours_per_time_unit.is_finite() || hours_per_time_unit < 0.0 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "hours_per_time_unit must be a non-negative number",
        ));
    }

    let tasks: Vec<Task> = req.tasks.into_iter().map(Task::from).collect();
    if let Err(e) = validate_tasks(&tasks) {
        return Err(error_response(StatusCode::BAD_REQUEST, &e.to_string()));
    }

    let sim_config = SimulationConfig {
        passes,
        hours_per_time_unit,
        max_buckets: config.max_buckets,
        record_passes: false,
    };
    let seed = req.seed;
    let include_histograms = req.include_histograms;

    // CPU-bound: keep it off the async workers.
    let joined = tokio::task::spawn_blocking(move || match seed {
        Some(seed) => run_simulation_with(&tasks, &sim_config, SplitMix64::new(seed)),
        None => run_simulation_with(&tasks, &sim_config, RngSampler::from_entropy()),
    })
    .await;

    match joined {
        Ok(Ok(run)) => Ok(Json(run_json(&run, include_histograms))),
        Ok(Err(e @ SimulationError::CapacityExceeded { .. })) => Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &e.to_string(),
        )),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Simulation failed");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, "Simulation task panicked");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "simulation task failed",
            ))
        }
    }
}

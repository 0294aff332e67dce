//! Scenario tests for the simulation engine and its entry points.

use task_forecast::error::BoxError;
use task_forecast::simulation::statistics::value_count;
use task_forecast::simulation::{
    run_progressive_with, run_simulation, run_simulation_progressive, run_simulation_with,
    CancellationToken, SimulationEngine, SplitMix64,
};
use task_forecast::{Progress, ResultSummary, SimulationConfig, Task};

fn project() -> Vec<Task> {
    vec![
        Task::new("spec", 3.0, 6.0, 0.9)
            .with_name("Write spec")
            .with_hourly_cost(120.0),
        Task::new("api", 10.0, 25.0, 0.7)
            .with_name("Build API")
            .with_hourly_cost(95.0),
        Task::new("ui", 8.0, 20.0, 0.6)
            .with_name("Build UI")
            .with_hourly_cost(90.0),
        Task::new("qa", 0.0, 5.0, 0.5)
            .with_name("QA pass")
            .with_hourly_cost(70.0),
    ]
}

fn assert_finite(label: &str, s: &ResultSummary) {
    for (name, v) in [
        ("median", s.median),
        ("std_dev", s.std_dev),
        ("likely_min", s.likely_min),
        ("likely_max", s.likely_max),
    ] {
        assert!(v.is_finite(), "{label} {name} is {v}");
    }
}

// ── Reference scenario ──────────────────────────────────────────────

#[test]
fn single_task_ten_thousand_passes() {
    let tasks = vec![Task::new("t", 36.0, 73.0, 0.9).with_hourly_cost(200.0)];
    let run = run_simulation(10_000, &tasks, 1.0).unwrap();

    assert!(run.times.median > 0.0);
    assert_finite("time", &run.times);
    assert_finite("cost", &run.costs);
    assert_eq!(value_count(&run.times.histogram), 10_000);
    assert_eq!(value_count(&run.costs.histogram), 10_000);

    // 90% of the mass is uniform on [36, 73]; the median sits close to its middle.
    assert!(
        run.times.median > 45.0 && run.times.median < 65.0,
        "median {}",
        run.times.median
    );
    assert!(run.times.likely_min <= run.times.median);
    assert!(run.times.likely_max >= run.times.median);
    // Cost is time × 200 per unit.
    assert!((run.costs.median / run.times.median - 200.0).abs() < 200.0 * 0.05);
}

#[test]
fn totals_dominate_every_task() {
    let tasks = project();
    let run = run_simulation_with(
        &tasks,
        &SimulationConfig::with_passes(20_000),
        SplitMix64::new(2024),
    )
    .unwrap();

    // Every pass total is at least each task's outcome, so quantiles dominate too.
    let largest_task_median = run
        .tasks
        .iter()
        .map(|t| t.times.median)
        .fold(0.0, f64::max);
    assert!(run.times.median >= largest_task_median);
    for task in &run.tasks {
        assert!(task.times.max <= run.times.max, "{}", task.id);
        assert!(task.costs.max <= run.costs.max, "{}", task.id);
    }
    assert_eq!(run.task("api").map(|t| t.name.as_str()), Some("Build API"));
    assert!(run.task("missing").is_none());
}

#[test]
fn hours_per_time_unit_scales_cost_only() {
    let tasks = project();
    let config = |hours| SimulationConfig {
        passes: 4000,
        hours_per_time_unit: hours,
        ..SimulationConfig::default()
    };
    let hourly = run_simulation_with(&tasks, &config(1.0), SplitMix64::new(5)).unwrap();
    let daily = run_simulation_with(&tasks, &config(8.0), SplitMix64::new(5)).unwrap();

    assert_eq!(hourly.times.histogram, daily.times.histogram);
    assert!((daily.costs.median - 8.0 * hourly.costs.median).abs() <= 8.0);
}

// ── Progressive mode ────────────────────────────────────────────────

#[tokio::test]
async fn progressive_and_synchronous_agree() {
    let tasks = project();
    let config = SimulationConfig::with_passes(12_345);

    let sync = run_simulation_with(&tasks, &config, SplitMix64::new(77)).unwrap();
    let progressive = run_progressive_with(
        &tasks,
        &config,
        SplitMix64::new(77),
        1000,
        &CancellationToken::new(),
        |_| async { Ok::<(), BoxError>(()) },
    )
    .await
    .unwrap();

    assert_eq!(value_count(&sync.times.histogram), 12_345);
    assert_eq!(
        value_count(&sync.times.histogram),
        value_count(&progressive.times.histogram)
    );
    assert_eq!(
        value_count(&sync.costs.histogram),
        value_count(&progressive.costs.histogram)
    );
    assert_eq!(sync.times.median, progressive.times.median);
}

#[tokio::test]
async fn progress_snapshots_grow_monotonically() {
    let tasks = project();
    let mut snapshots: Vec<Progress> = Vec::new();
    let run = run_simulation_progressive(
        5500,
        &tasks,
        |p: Progress| {
            snapshots.push(p);
            async { Ok::<(), BoxError>(()) }
        },
        1000,
        1.0,
    )
    .await
    .unwrap();

    assert_eq!(snapshots.len(), 6);
    for (i, p) in snapshots.iter().enumerate() {
        let expected = ((i + 1) * 1000).min(5500);
        assert_eq!(p.processed_passes, expected);
        assert_eq!(p.total_passes, 5500);
        assert_eq!(value_count(&p.times.histogram), expected as u64);
        assert_eq!(value_count(&p.costs.histogram), expected as u64);
        assert_eq!(p.has_more_batches, i + 1 < snapshots.len());
    }
    assert_eq!(value_count(&run.times.histogram), 5500);
}

#[tokio::test]
async fn async_callback_is_awaited_before_next_batch() {
    let tasks = project();
    let mut order = Vec::new();
    let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = log.clone();
    run_simulation_progressive(
        3000,
        &tasks,
        |p: Progress| {
            // Completed callbacks so far: all earlier ones must have finished.
            let completed = sink.lock().unwrap().len();
            order.push((p.processed_passes, completed));
            let sink = sink.clone();
            async move {
                tokio::task::yield_now().await;
                sink.lock().unwrap().push(p.processed_passes);
                Ok::<(), BoxError>(())
            }
        },
        1000,
        1.0,
    )
    .await
    .unwrap();

    assert_eq!(order, vec![(1000, 0), (2000, 1), (3000, 2)]);
    assert_eq!(*log.lock().unwrap(), vec![1000, 2000, 3000]);
}

#[tokio::test]
async fn concurrent_runs_are_independent() {
    let tasks = project();
    let config = SimulationConfig::with_passes(3000);
    let noop = |_: Progress| async { Ok::<(), BoxError>(()) };
    let cancel = CancellationToken::new();

    let (a, b) = tokio::join!(
        run_progressive_with(&tasks, &config, SplitMix64::new(1), 250, &cancel, noop),
        run_progressive_with(&tasks, &config, SplitMix64::new(1), 700, &cancel, noop),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.times.histogram, b.times.histogram);
    assert_eq!(a.costs.histogram, b.costs.histogram);
}

#[tokio::test]
async fn host_scheduler_runs_between_batches() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let tasks = project();
    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = {
        let ticks = ticks.clone();
        tokio::spawn(async move {
            loop {
                ticks.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        })
    };

    let mut seen = Vec::new();
    run_progressive_with(
        &tasks,
        &SimulationConfig::with_passes(5000),
        SplitMix64::new(11),
        1000,
        &CancellationToken::new(),
        |_: Progress| {
            seen.push(ticks.load(Ordering::SeqCst));
            async { Ok::<(), BoxError>(()) }
        },
    )
    .await
    .unwrap();
    ticker.abort();

    // The other task got a turn after every batch.
    assert_eq!(seen.len(), 5);
    for pair in seen.windows(2) {
        assert!(pair[1] > pair[0], "no tick between batches: {seen:?}");
    }
}

// ── Step function ───────────────────────────────────────────────────

#[test]
fn externally_driven_steps() {
    let tasks = project();
    let config = SimulationConfig::with_passes(1000);
    let mut engine = SimulationEngine::new(&tasks, &config, SplitMix64::new(3)).unwrap();

    let mut batches = 0;
    while !engine.is_done() {
        engine.run_batch(300);
        batches += 1;
        let progress = engine.progress();
        assert_eq!(
            value_count(&progress.times.histogram),
            progress.processed_passes as u64
        );
    }
    assert_eq!(batches, 4);

    let run = engine.finish();
    assert_eq!(run.passes, 1000);
    assert_eq!(run.tasks.len(), tasks.len());
}

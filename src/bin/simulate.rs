use task_forecast::constants::{DEFAULT_HOURS_PER_TIME_UNIT, DEFAULT_PASSES};
use task_forecast::error::BoxError;
use task_forecast::simulation::{
    convergence_sweep, default_pass_grid, load_tasks, parse_pass_grid, run_progressive_with,
    run_simulation_with, save_json, CancellationToken, RngSampler, SplitMix64,
};
use task_forecast::types::validate_tasks;
use task_forecast::{Progress, ResultSummary, SimulationConfig, SimulationRun, Task};

struct Args {
    tasks_path: String,
    passes: usize,
    seed: Option<u64>,
    hours_per_time_unit: f64,
    progress: Option<usize>,
    record_passes: bool,
    max_buckets: usize,
    sweep: Option<Vec<usize>>,
    output: Option<String>,
}

const USAGE: &str = "Usage: forecast-simulate --tasks FILE [--passes N] [--seed S] [--hours-per-unit H] [--progress K] [--record-passes] [--max-buckets N] [--sweep GRID] [--output FILE]";

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).and_then(|s| s.parse().ok()) {
        Some(v) => v,
        None => {
            eprintln!("Invalid {} value: {}", flag, args.get(i).map_or("", |s| s));
            std::process::exit(1);
        }
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut tasks_path: Option<String> = None;
    let mut passes = DEFAULT_PASSES;
    let mut seed: Option<u64> = None;
    let mut hours_per_time_unit = DEFAULT_HOURS_PER_TIME_UNIT;
    let mut progress: Option<usize> = None;
    let mut record_passes = false;
    let mut max_buckets = task_forecast::env_config::max_buckets();
    let mut sweep: Option<Vec<usize>> = None;
    let mut output: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tasks" => {
                i += 1;
                tasks_path = args.get(i).cloned();
            }
            "--passes" => {
                i += 1;
                passes = parse_value(&args, i, "--passes");
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_value(&args, i, "--seed"));
            }
            "--hours-per-unit" => {
                i += 1;
                hours_per_time_unit = parse_value(&args, i, "--hours-per-unit");
            }
            "--progress" => {
                i += 1;
                progress = Some(parse_value(&args, i, "--progress"));
            }
            "--record-passes" => {
                record_passes = true;
            }
            "--max-buckets" => {
                i += 1;
                max_buckets = parse_value(&args, i, "--max-buckets");
            }
            "--sweep" => {
                i += 1;
                let grid = match args.get(i).map(String::as_str) {
                    Some("default") => Some(default_pass_grid()),
                    Some(s) => parse_pass_grid(s),
                    None => None,
                };
                if grid.is_none() {
                    eprintln!("Invalid --sweep grid (use 'default' or e.g. 100,1000,10000)");
                    std::process::exit(1);
                }
                sweep = grid;
            }
            "--output" => {
                i += 1;
                output = args.get(i).cloned();
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!("  --tasks FILE         JSON array of tasks (id, name, min, max, confidence 0-1, hourly_cost)");
                println!("  --passes N           Number of simulated passes (default: {})", DEFAULT_PASSES);
                println!("  --seed S             Reproducible SplitMix64 stream (default: fresh random)");
                println!("  --hours-per-unit H   Hours per time unit for cost (default: 1)");
                println!("  --progress K         Run in batches of K passes, printing progress");
                println!("  --record-passes      Keep every pass's outcomes in the output");
                println!("  --max-buckets N      Histogram bucket ceiling (env FORECAST_MAX_BUCKETS)");
                println!("  --sweep GRID         Parallel convergence sweep over pass counts");
                println!("  --output FILE        Write the result as JSON");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let tasks_path = match tasks_path {
        Some(p) => p,
        None => {
            eprintln!("Error: --tasks FILE is required");
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    if sweep.is_some() && progress.is_some() {
        eprintln!("Error: --sweep and --progress are mutually exclusive");
        std::process::exit(1);
    }

    Args {
        tasks_path,
        passes,
        seed,
        hours_per_time_unit,
        progress,
        record_passes,
        max_buckets,
        sweep,
        output,
    }
}

fn print_summary(label: &str, s: &ResultSummary) {
    println!(
        "  {:<6} median {:>10.1}  likely {:>8}-{:<8} std dev {:>9.2}  range {}-{}",
        label, s.median, s.likely_min, s.likely_max, s.std_dev, s.min, s.max
    );
}

fn print_report(run: &SimulationRun) {
    println!();
    println!(
        "Results ({} passes in {:.1} ms)",
        run.passes,
        run.elapsed.as_secs_f64() * 1000.0
    );
    print_summary("Time", &run.times);
    print_summary("Cost", &run.costs);
    println!();
    println!("Per task:");
    for task in &run.tasks {
        println!(
            "  {:<24} time {}-{} (median {:.1})  cost {}-{} (median {:.1})",
            task.name,
            task.times.likely_min,
            task.times.likely_max,
            task.times.median,
            task.costs.likely_min,
            task.costs.likely_max,
            task.costs.median
        );
    }
}

fn run_progressive(
    tasks: &[Task],
    config: &SimulationConfig,
    interval: usize,
    seed: Option<u64>,
) -> task_forecast::Result<SimulationRun> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let cancel = CancellationToken::new();
        let watcher = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                watcher.cancel();
            }
        });

        let on_progress = |p: Progress| {
            println!(
                "  {:>8}/{:<8} time median {:>8.1}  cost median {:>10.1}",
                p.processed_passes, p.total_passes, p.times.median, p.costs.median
            );
            std::future::ready(Ok::<(), BoxError>(()))
        };

        match seed {
            Some(seed) => {
                run_progressive_with(tasks, config, SplitMix64::new(seed), interval, &cancel, on_progress)
                    .await
            }
            None => {
                run_progressive_with(
                    tasks,
                    config,
                    RngSampler::from_entropy(),
                    interval,
                    &cancel,
                    on_progress,
                )
                .await
            }
        }
    })
}

fn main() {
    task_forecast::env_config::init_tracing();
    let args = parse_args();

    let tasks = match load_tasks(&args.tasks_path) {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Failed to load tasks from {}: {}", args.tasks_path, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = validate_tasks(&tasks) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config = SimulationConfig {
        passes: args.passes,
        hours_per_time_unit: args.hours_per_time_unit,
        max_buckets: args.max_buckets,
        record_passes: args.record_passes,
    };

    println!("Task forecast ({} tasks)", tasks.len());

    // ── Convergence sweep mode ──────────────────────────────────────────
    if let Some(ref grid) = args.sweep {
        let num_threads = task_forecast::env_config::init_rayon_threads();
        println!("  Mode: sweep over {} pass counts ({} threads)", grid.len(), num_threads);
        let points = match convergence_sweep(&tasks, grid, &config, args.seed.unwrap_or(42)) {
            Ok(points) => points,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        println!();
        println!(
            "  {:>9}  {:>12}  {:>12}  {:>12}  {:>12}  {:>10}",
            "passes", "time med", "time sd", "cost med", "cost sd", "ms"
        );
        for p in &points {
            println!(
                "  {:>9}  {:>12.1}  {:>12.2}  {:>12.1}  {:>12.2}  {:>10.1}",
                p.passes, p.time_median, p.time_std_dev, p.cost_median, p.cost_std_dev, p.elapsed_ms
            );
        }
        if let Some(ref path) = args.output {
            if let Err(e) = save_json(&points, path) {
                eprintln!("Failed to write {}: {}", path, e);
                std::process::exit(1);
            }
            println!("\nWrote sweep to {}", path);
        }
        return;
    }

    // ── Single run ──────────────────────────────────────────────────────
    let result = match (args.progress, args.seed) {
        (Some(interval), seed) => {
            println!("  Mode: progressive, batches of {}", interval);
            run_progressive(&tasks, &config, interval, seed)
        }
        (None, Some(seed)) => run_simulation_with(&tasks, &config, SplitMix64::new(seed)),
        (None, None) => run_simulation_with(&tasks, &config, RngSampler::from_entropy()),
    };

    let run = match result {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    print_report(&run);

    if let Some(ref path) = args.output {
        if let Err(e) = save_json(&run, path) {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        }
        println!("\nWrote results to {}", path);
    }
}

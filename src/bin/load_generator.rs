//! Load Generator
//!
//! Feeds batches of random orders through fresh engines and reports how long
//! each batch took and how many fills it produced.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scan_matching_engine::{
    loadgen::{run_load_test, LoadTestConfig},
    utils::time::as_millis_f64,
    EngineConfig, PolicyKind,
};

#[derive(Debug, Parser)]
#[command(name = "load_generator", about = "Measure matching performance on random order flow")]
struct Args {
    /// Number of independent runs, each on an empty book
    #[arg(short, long, default_value_t = 10)]
    iterations: usize,

    /// Orders submitted per run
    #[arg(short, long, default_value_t = 100_000)]
    orders: usize,

    /// Base RNG seed; run `i` uses `seed + i`
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run iterations concurrently, one engine per iteration
    #[arg(long)]
    parallel: bool,

    /// TOML file with engine settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the matching policy (scan-order | price-time)
    #[arg(short, long)]
    policy: Option<PolicyKind>,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut engine = EngineConfig::load(args.config.as_deref())?;
    if let Some(policy) = args.policy {
        engine.policy = policy;
    }

    let config = LoadTestConfig {
        iterations: args.iterations,
        orders_per_iteration: args.orders,
        seed: args.seed,
        parallel: args.parallel,
        engine,
    };

    let summary = run_load_test(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for report in &summary.iterations {
        let latency = report.latency.to_micros();
        println!("Iteration {}:", report.iteration);
        println!("  Time Taken: {:.2} ms", as_millis_f64(report.elapsed));
        println!("  Matched Orders: {}", report.fill_events);
        println!("  Resting Orders: {}", report.resting_orders);
        println!(
            "  Latency (μs): p50={:.2} p99={:.2} max={:.2}",
            latency.p50, latency.p99, latency.max
        );
    }

    println!();
    println!("Performance Summary:");
    println!(
        "  Average Time per {} Orders: {:.2} ms",
        config.orders_per_iteration, summary.average_elapsed_ms
    );
    println!("  Average Matched Orders: {}", summary.average_fill_events);

    info!("Load test complete");
    Ok(())
}

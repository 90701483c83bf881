//! Interactive Order Console
//!
//! Reads orders from stdin, one per line, matches them and prints the
//! resulting book and statistics after each one.
//!
//! ```text
//! buy 5.00 10        submit an order (side price quantity)
//! random 1000        submit 1000 random orders
//! book               print the book
//! stats              print the statistics
//! reset              empty the book and zero the statistics
//! quit
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use scan_matching_engine::{
    loadgen::RandomOrderGenerator,
    metrics::{exporters, MetricsReporter},
    utils::{format_decimal, format_report, render_book},
    EngineConfig, MatchStatus, MatchingEngine, OrderRequest, PolicyKind, SharedEngine,
};

#[derive(Debug, Parser)]
#[command(name = "order_console", about = "Submit orders to the matching engine from stdin")]
struct Args {
    /// TOML file with engine settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the matching policy from the config file (scan-order | price-time)
    #[arg(short, long)]
    policy: Option<PolicyKind>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,

    /// Seconds between statistics log lines; 0 disables the reporter
    #[arg(long, default_value_t = 0)]
    report_interval: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut config = EngineConfig::load(args.config.as_deref())?;
    if let Some(policy) = args.policy {
        config.policy = policy;
    }

    info!("Starting order console with {} policy", config.policy);

    if let Some(addr) = args.metrics_addr {
        if let Err(e) = exporters::install_prometheus(addr) {
            error!("Failed to start metrics server: {}", e);
        }
    }

    let engine = SharedEngine::new(MatchingEngine::from_config(&config));

    if args.report_interval > 0 {
        let reporter =
            MetricsReporter::new(engine.clone(), Duration::from_secs(args.report_interval));
        tokio::spawn(async move {
            reporter.run().await;
        });
    }

    let mut generator = RandomOrderGenerator::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => break,
                };

                match handle_line(line.trim(), &engine, &mut generator, config.display_precision) {
                    Command::Continue => {}
                    Command::Quit => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    let report = engine.statistics().report();
    info!(
        "Final stats: {} orders, {} fills, {} resting",
        report.orders_processed,
        report.fill_events,
        engine.resting_orders()
    );

    Ok(())
}

enum Command {
    Continue,
    Quit,
}

fn handle_line(
    line: &str,
    engine: &SharedEngine,
    generator: &mut RandomOrderGenerator,
    dp: u32,
) -> Command {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts.as_slice() {
        [] => {}
        ["quit"] | ["exit"] => return Command::Quit,
        ["book"] => print!("{}", render_book(&engine.snapshot(), dp)),
        ["stats"] => println!("{}", format_report(&engine.statistics().report())),
        ["reset"] => engine.with(|e| e.reset()),
        ["random", count] => match count.parse::<usize>() {
            Ok(count) => {
                match engine.submit_many(generator.orders(count)) {
                    Ok(results) => {
                        let fills: usize = results.iter().map(|r| r.fills.len()).sum();
                        println!("Submitted {} random orders, {} fills", count, fills);
                    }
                    Err(e) => error!("Random batch aborted: {}", e),
                }
                print_state(engine, dp);
            }
            Err(_) => warn!("Invalid count '{}'", count),
        },
        [side, price, quantity] => {
            match engine.submit_request(OrderRequest::new(*side, *price, *quantity)) {
                Ok(result) => {
                    for fill in &result.fills {
                        println!(
                            "Matched {} @ {} (notional {})",
                            format_decimal(fill.quantity, dp),
                            format_decimal(fill.price, dp),
                            format_decimal(fill.notional(), dp)
                        );
                    }
                    if result.rested() {
                        println!(
                            "Resting {} {} @ {}",
                            result.order.side,
                            format_decimal(result.order.quantity, dp),
                            format_decimal(result.order.price, dp)
                        );
                    } else if result.status == MatchStatus::Discarded {
                        println!("Nothing to match or rest");
                    }
                    print_state(engine, dp);
                }
                Err(e) => println!("{}", e),
            }
        }
        _ => println!("Expected: <buy|sell> <price> <quantity>, random <n>, book, stats, reset or quit"),
    }

    Command::Continue
}

fn print_state(engine: &SharedEngine, dp: u32) {
    print!("{}", render_book(&engine.snapshot(), dp));
    println!("{}", format_report(&engine.statistics().report()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_line_submits_orders() {
        let engine = SharedEngine::new(MatchingEngine::new());
        let mut generator = RandomOrderGenerator::seeded(3);

        handle_line("sell 4.50 5", &engine, &mut generator, 2);
        handle_line("buy 5.00 10", &engine, &mut generator, 2);
        handle_line("buy -1 10", &engine, &mut generator, 2);

        let stats = engine.statistics();
        assert_eq!(stats.orders_processed, 2);
        assert_eq!(stats.fill_events, 1);
        assert_eq!(engine.resting_orders(), 1);
    }

    #[test]
    fn test_handle_line_commands() {
        let engine = SharedEngine::new(MatchingEngine::new());
        let mut generator = RandomOrderGenerator::seeded(3);

        assert!(matches!(
            handle_line("random 25", &engine, &mut generator, 2),
            Command::Continue
        ));
        assert_eq!(engine.statistics().orders_processed, 25);

        handle_line("reset", &engine, &mut generator, 2);
        assert_eq!(engine.statistics().orders_processed, 0);
        assert_eq!(engine.resting_orders(), 0);

        assert!(matches!(
            handle_line("quit", &engine, &mut generator, 2),
            Command::Quit
        ));
    }
}

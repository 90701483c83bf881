//! Random order flow for exercising the engine under load.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::metrics::collectors::{LatencyCollector, LatencyStatistics};
use crate::orderbook::engine::MatchingEngine;
use crate::orderbook::error::OrderBookResult;
use crate::orderbook::types::{Order, Side};
use crate::utils::time::{as_millis_f64, LatencyTimer};

/// Produces orders priced in [0, 100) and sized in [1, 11), both to the
/// cent, with an even split between buys and sells.
#[derive(Debug)]
pub struct RandomOrderGenerator {
    rng: StdRng,
}

impl RandomOrderGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_order(&mut self) -> Order {
        let price = Decimal::new(self.rng.gen_range(0..10_000), 2);
        let quantity = Decimal::new(self.rng.gen_range(100..1_100), 2);
        let side = if self.rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };

        Order::new(side, price, quantity)
    }

    pub fn orders(&mut self, count: usize) -> Vec<Order> {
        (0..count).map(|_| self.next_order()).collect()
    }
}

impl Default for RandomOrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for RandomOrderGenerator {
    type Item = Order;

    fn next(&mut self) -> Option<Order> {
        Some(self.next_order())
    }
}

#[derive(Debug, Clone)]
pub struct LoadTestConfig {
    pub iterations: usize,
    pub orders_per_iteration: usize,
    /// Iteration `i` uses `seed + i`; `None` draws from entropy
    pub seed: Option<u64>,
    /// Run iterations on the rayon pool, each with its own engine
    pub parallel: bool,
    pub engine: EngineConfig,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            orders_per_iteration: 100_000,
            seed: None,
            parallel: false,
            engine: EngineConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IterationReport {
    pub iteration: usize,
    pub elapsed: Duration,
    pub orders_processed: u64,
    pub fill_events: u64,
    pub resting_orders: usize,
    pub latency: LatencyStatistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadTestSummary {
    pub iterations: Vec<IterationReport>,
    pub average_elapsed_ms: f64,
    pub average_fill_events: f64,
}

/// Fresh engine, `orders` random submissions, timed as a whole and per order.
pub fn run_iteration(
    iteration: usize,
    orders: usize,
    seed: Option<u64>,
    config: &EngineConfig,
) -> OrderBookResult<IterationReport> {
    let mut generator = match seed {
        Some(seed) => RandomOrderGenerator::seeded(seed),
        None => RandomOrderGenerator::new(),
    };
    let mut engine = MatchingEngine::from_config(config);
    let mut latencies = LatencyCollector::with_capacity(orders);

    let timer = LatencyTimer::start();
    for order in generator.by_ref().take(orders) {
        let submit_timer = LatencyTimer::start();
        engine.submit(order)?;
        latencies.record(submit_timer.stop());
    }
    let elapsed = timer.stop();

    let stats = engine.statistics();
    debug!(
        "Iteration {} finished: {} fills, {} resting",
        iteration + 1,
        stats.fill_events,
        engine.book().len()
    );

    Ok(IterationReport {
        iteration: iteration + 1,
        elapsed,
        orders_processed: stats.orders_processed,
        fill_events: stats.fill_events,
        resting_orders: engine.book().len(),
        latency: latencies.statistics(),
    })
}

pub fn run_load_test(config: &LoadTestConfig) -> OrderBookResult<LoadTestSummary> {
    info!(
        "Running {} iterations of {} orders ({} policy, parallel: {})",
        config.iterations, config.orders_per_iteration, config.engine.policy, config.parallel
    );

    let run = |i: usize| {
        run_iteration(
            i,
            config.orders_per_iteration,
            config.seed.map(|s| s.wrapping_add(i as u64)),
            &config.engine,
        )
    };

    let iterations: Vec<IterationReport> = if config.parallel {
        (0..config.iterations)
            .into_par_iter()
            .map(run)
            .collect::<OrderBookResult<_>>()?
    } else {
        (0..config.iterations)
            .map(run)
            .collect::<OrderBookResult<_>>()?
    };

    let count = iterations.len().max(1) as f64;
    let average_elapsed_ms = iterations
        .iter()
        .map(|r| as_millis_f64(r.elapsed))
        .sum::<f64>()
        / count;
    let average_fill_events = iterations.iter().map(|r| r.fill_events as f64).sum::<f64>() / count;

    Ok(LoadTestSummary {
        iterations,
        average_elapsed_ms,
        average_fill_events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_generated_order_ranges() {
        let mut generator = RandomOrderGenerator::seeded(7);

        for order in generator.orders(1_000) {
            assert!(order.price >= dec!(0) && order.price < dec!(100));
            assert!(order.quantity >= dec!(1) && order.quantity < dec!(11));
            assert_eq!(order.price.scale(), 2);
            assert_eq!(order.quantity, order.original_quantity);
        }
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let a: Vec<_> = RandomOrderGenerator::seeded(42)
            .take(50)
            .map(|o| (o.side, o.price, o.quantity))
            .collect();
        let b: Vec<_> = RandomOrderGenerator::seeded(42)
            .take(50)
            .map(|o| (o.side, o.price, o.quantity))
            .collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_run_iteration() {
        let report = run_iteration(0, 500, Some(1), &EngineConfig::default()).unwrap();

        assert_eq!(report.iteration, 1);
        assert_eq!(report.orders_processed, 500);
        assert_eq!(report.latency.count, 500);
        assert!(report.resting_orders <= 500);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let sequential = LoadTestConfig {
            iterations: 3,
            orders_per_iteration: 300,
            seed: Some(9),
            parallel: false,
            engine: EngineConfig::default(),
        };
        let parallel = LoadTestConfig {
            parallel: true,
            ..sequential.clone()
        };

        let a = run_load_test(&sequential).unwrap();
        let b = run_load_test(&parallel).unwrap();

        let fills = |s: &LoadTestSummary| -> Vec<u64> {
            s.iterations.iter().map(|r| r.fill_events).collect()
        };
        assert_eq!(fills(&a), fills(&b));
        assert_eq!(a.average_fill_events, b.average_fill_events);
    }
}

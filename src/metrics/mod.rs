use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::orderbook::engine::SharedEngine;
use crate::orderbook::types::Side;
use crate::utils::time::as_millis_f64;

pub mod collectors;
pub mod exporters;

/// Running counters owned by one engine.
///
/// Only the engine writes these; callers get a copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingStatistics {
    /// One per submitted order, matched or not
    pub orders_processed: u64,
    /// One per pairwise fill, not per order
    pub fill_events: u64,
    /// Wall-clock time spent inside `submit`, summed
    pub cumulative_matching_time: Duration,
}

impl MatchingStatistics {
    pub(crate) fn record_submission(&mut self, fill_events: usize, elapsed: Duration) {
        self.orders_processed += 1;
        self.fill_events += fill_events as u64;
        self.cumulative_matching_time += elapsed;
    }

    pub fn cumulative_matching_time_ms(&self) -> f64 {
        as_millis_f64(self.cumulative_matching_time)
    }

    /// Derived figures; both are zero before the first submission.
    pub fn report(&self) -> StatisticsReport {
        if self.orders_processed == 0 {
            return StatisticsReport::default();
        }

        let processed = self.orders_processed as f64;
        StatisticsReport {
            orders_processed: self.orders_processed,
            fill_events: self.fill_events,
            matched_percentage: self.fill_events as f64 / processed * 100.0,
            average_matching_time_ms: self.cumulative_matching_time_ms() / processed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub orders_processed: u64,
    pub fill_events: u64,
    /// Fill events per hundred orders; exceeds 100 when orders sweep
    /// several resting orders
    pub matched_percentage: f64,
    pub average_matching_time_ms: f64,
}

/// Register descriptions with whatever recorder is installed.
pub fn describe_engine_metrics() {
    describe_counter!("matching_orders_total", "Total number of orders submitted");
    describe_counter!("matching_fills_total", "Total number of pairwise fill events");
    describe_histogram!(
        "matching_submit_duration_seconds",
        "Wall-clock duration of one submission"
    );
    describe_gauge!(
        "matching_book_depth",
        "Current number of resting orders per side"
    );
}

/// Mirror one submission into the global metrics facade.
pub(crate) fn record_submission(
    policy: &'static str,
    fill_events: usize,
    elapsed: Duration,
    buy_depth: usize,
    sell_depth: usize,
) {
    counter!("matching_orders_total", "policy" => policy).increment(1);
    counter!("matching_fills_total", "policy" => policy).increment(fill_events as u64);
    histogram!("matching_submit_duration_seconds", "policy" => policy)
        .record(elapsed.as_secs_f64());
    gauge!("matching_book_depth", "side" => Side::Buy.as_str()).set(buy_depth as f64);
    gauge!("matching_book_depth", "side" => Side::Sell.as_str()).set(sell_depth as f64);
}

/// Background statistics reporter
pub struct MetricsReporter {
    engine: SharedEngine,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(engine: SharedEngine, interval: Duration) -> Self {
        Self { engine, interval }
    }

    pub async fn run(&self) {
        let mut interval = interval(self.interval);

        loop {
            interval.tick().await;

            let report = self.engine.statistics().report();
            let (resting, buy_quantity, sell_quantity) = self.engine.with(|engine| {
                let book = engine.book();
                (
                    book.len(),
                    book.side_quantity(Side::Buy),
                    book.side_quantity(Side::Sell),
                )
            });

            info!(
                "Engine Metrics - Orders: {} | Fills: {} | Matched: {:.2}% | Avg matching time: {:.4}ms | Resting: {} (buy qty {}, sell qty {})",
                report.orders_processed,
                report.fill_events,
                report.matched_percentage,
                report.average_matching_time_ms,
                resting,
                buy_quantity,
                sell_quantity
            );
        }
    }
}

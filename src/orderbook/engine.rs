use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::metrics::{self as engine_metrics, MatchingStatistics};
use crate::orderbook::book::OrderBook;
use crate::orderbook::error::OrderBookResult;
use crate::orderbook::matching::{MatchingPolicy, ScanOrderMatching};
use crate::orderbook::types::{validate_order, BookEntry, MatchResult, Order, OrderRequest, Side};
use crate::utils::time::LatencyTimer;

/// Matches incoming orders against its own book and keeps running statistics.
///
/// Orders are processed one at a time: each `submit` scans, mutates the
/// book and updates the counters before returning.
#[derive(Debug)]
pub struct MatchingEngine {
    book: OrderBook,
    policy: Box<dyn MatchingPolicy>,
    statistics: MatchingStatistics,
    validate_orders: bool,
}

impl MatchingEngine {
    /// Engine with the scan-order policy and boundary validation enabled.
    pub fn new() -> Self {
        Self::with_policy(Box::new(ScanOrderMatching))
    }

    pub fn with_policy(policy: Box<dyn MatchingPolicy>) -> Self {
        info!("Creating matching engine with {} policy", policy.name());

        Self {
            book: OrderBook::new(),
            policy,
            statistics: MatchingStatistics::default(),
            validate_orders: true,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut engine = Self::with_policy(config.policy.build());
        engine.validate_orders = config.validate_orders;
        engine
    }

    /// Match `order` against the book and rest any remainder.
    ///
    /// Performs no validation; see `try_submit`.
    pub fn submit(&mut self, mut order: Order) -> OrderBookResult<MatchResult> {
        let timer = LatencyTimer::start();

        let fills = match self.policy.match_order(&mut order, &mut self.book) {
            Ok(fills) => fills,
            Err(e) => {
                self.statistics.record_submission(0, timer.stop());
                return Err(e);
            }
        };

        if order.quantity > Decimal::ZERO {
            self.book.append(order.clone());
        }

        let elapsed = timer.stop();
        self.statistics.record_submission(fills.len(), elapsed);
        engine_metrics::record_submission(
            self.policy.name(),
            fills.len(),
            elapsed,
            self.book.side_count(Side::Buy),
            self.book.side_count(Side::Sell),
        );

        let result = MatchResult::new(order, fills);
        debug!(
            "Order {} {:?} with {} fills in {:?}",
            result.order.id,
            result.status,
            result.fills.len(),
            elapsed
        );

        Ok(result)
    }

    /// Validate at the boundary (when enabled), then submit.
    ///
    /// Rejected orders are not counted as processed.
    pub fn try_submit(&mut self, order: Order) -> OrderBookResult<MatchResult> {
        if self.validate_orders {
            if let Err(e) = validate_order(&order) {
                warn!("Rejected order {}: {}", order.id, e);
                return Err(e);
            }
        }

        self.submit(order)
    }

    /// Parse raw fields into an order and submit it.
    pub fn submit_request(&mut self, request: OrderRequest) -> OrderBookResult<MatchResult> {
        let order = request.into_order().map_err(|e| {
            warn!("Rejected order request: {}", e);
            e
        })?;

        self.submit(order)
    }

    /// Submit each order in sequence; stops at the first error.
    pub fn submit_many<I>(&mut self, orders: I) -> OrderBookResult<Vec<MatchResult>>
    where
        I: IntoIterator<Item = Order>,
    {
        orders.into_iter().map(|order| self.submit(order)).collect()
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn statistics(&self) -> MatchingStatistics {
        self.statistics
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Empty the book and zero the statistics.
    pub fn reset(&mut self) {
        info!(
            "Resetting engine: dropping {} resting orders after {} submissions",
            self.book.len(),
            self.statistics.orders_processed
        );
        self.book.clear();
        self.statistics = MatchingStatistics::default();
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// A `MatchingEngine` shared between tasks.
///
/// Every call holds the lock for its whole duration, so submissions never
/// interleave.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<MatchingEngine>>,
}

impl SharedEngine {
    pub fn new(engine: MatchingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn try_submit(&self, order: Order) -> OrderBookResult<MatchResult> {
        self.inner.lock().try_submit(order)
    }

    pub fn submit_request(&self, request: OrderRequest) -> OrderBookResult<MatchResult> {
        self.inner.lock().submit_request(request)
    }

    pub fn submit_many<I>(&self, orders: I) -> OrderBookResult<Vec<MatchResult>>
    where
        I: IntoIterator<Item = Order>,
    {
        self.inner.lock().submit_many(orders)
    }

    pub fn snapshot(&self) -> Vec<BookEntry> {
        self.inner.lock().book().snapshot()
    }

    pub fn resting_orders(&self) -> usize {
        self.inner.lock().book().len()
    }

    pub fn statistics(&self) -> MatchingStatistics {
        self.inner.lock().statistics()
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut MatchingEngine) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

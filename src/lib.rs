//! Scan-Order Matching Engine
//!
//! A continuous order matching engine with exact decimal prices and
//! quantities. Each incoming order is matched against resting orders of the
//! opposite side; whatever is left over rests in the book.
//!
//! # Features
//!
//! - **Exact arithmetic**: prices and quantities are `rust_decimal::Decimal`
//! - **Scan-order matching**: the book is a single insertion-ordered list and
//!   the first crossing order wins, as in the reference behaviour
//! - **Pluggable policy**: a best-price-first `PriceTimeMatching` can replace
//!   the scan without changing the engine's contract
//! - **Statistics**: orders processed, fill events and cumulative matching
//!   time, plus Prometheus metrics through the `metrics` facade
//!
//! # Quick Start
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use scan_matching_engine::{MatchingEngine, Order};
//!
//! let mut engine = MatchingEngine::new();
//!
//! engine.submit(Order::sell(dec!(4.50), dec!(5)))?;
//! let result = engine.submit(Order::buy(dec!(5.00), dec!(10)))?;
//!
//! assert_eq!(result.fills.len(), 1);
//! assert_eq!(result.fills[0].price, dec!(4.50));
//! assert_eq!(engine.book().len(), 1); // Buy 5 @ 5.00 rests
//!
//! println!("{:?}", engine.statistics().report());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - `orderbook::book::OrderBook` holds resting orders of both sides in
//!   arrival order
//! - `orderbook::matching` holds the `MatchingPolicy` trait and its two
//!   implementations
//! - `orderbook::engine::MatchingEngine` owns one book, one policy and the
//!   running `MatchingStatistics`; `SharedEngine` serialises access to it
//!   across threads

pub mod config;
pub mod loadgen;
pub mod metrics;
pub mod orderbook;
pub mod utils;

// Re-export commonly used types
pub use config::EngineConfig;
pub use orderbook::{
    error::{OrderBookError, OrderBookResult},
    types::{
        BookEntry, Fill, MatchResult, MatchStatus, Order, OrderRequest, Price, Quantity, Side,
    },
    MatchingEngine, OrderBook, PolicyKind, SharedEngine,
};

pub use crate::metrics::{MatchingStatistics, StatisticsReport};

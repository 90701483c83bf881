//! Core order book and matching module
//!
//! The book is one append-ordered list of resting orders; a pluggable
//! matching policy decides which of them an incoming order trades with.

pub mod book;
pub mod engine;
pub mod error;
pub mod matching;
pub mod types;

// Re-export main types for convenience
pub use book::OrderBook;
pub use engine::{MatchingEngine, SharedEngine};
pub use error::{OrderBookError, OrderBookResult};
pub use matching::{MatchingPolicy, PolicyKind, PriceTimeMatching, ScanOrderMatching};
pub use types::{
    BookEntry, Fill, MatchResult, MatchStatus, Order, OrderId, OrderRequest, Price, Quantity,
    Side,
};

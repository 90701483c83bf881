use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error};

use crate::orderbook::book::OrderBook;
use crate::orderbook::error::{OrderBookError, OrderBookResult};
use crate::orderbook::types::{Fill, Order, Side};

/// Strategy that decides which resting orders an incoming order trades with.
///
/// A policy mutates quantities and removes exhausted resting orders. It
/// never appends the remainder of the incoming order; the engine does that.
/// A failed pass must leave the book and the incoming order untouched; call
/// `check_crossing_orders` before the first fill.
pub trait MatchingPolicy: fmt::Debug + Send + Sync {
    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;

    fn match_order(
        &self,
        order: &mut Order,
        book: &mut OrderBook,
    ) -> OrderBookResult<Vec<Fill>>;
}

/// Linear scan over the book in insertion order.
///
/// The first crossing opposite-side order is filled first, regardless of
/// whether a better priced one rests further down.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOrderMatching;

impl MatchingPolicy for ScanOrderMatching {
    fn name(&self) -> &'static str {
        PolicyKind::ScanOrder.as_str()
    }

    fn match_order(
        &self,
        order: &mut Order,
        book: &mut OrderBook,
    ) -> OrderBookResult<Vec<Fill>> {
        let mut fills = Vec::new();

        debug!(
            "Scan matching {} {} @ {} against {} resting orders",
            order.side,
            order.quantity,
            order.price,
            book.len()
        );

        check_crossing_orders(order, book)?;

        let mut position = 0;
        while order.quantity > Decimal::ZERO && position < book.len() {
            let exhausted = match book.get_mut(position) {
                Some(resting) => {
                    if !order.crosses(resting) {
                        position += 1;
                        continue;
                    }
                    fills.push(execute_fill(order, resting, position)?);
                    resting.quantity.is_zero()
                }
                None => break,
            };

            // A removal pulls the next order into this position.
            if exhausted {
                book.remove_at(position);
            } else {
                position += 1;
            }
        }

        Ok(fills)
    }
}

/// Best price first, earliest arrival among equal prices.
///
/// Drop-in alternative to `ScanOrderMatching` with the same contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceTimeMatching;

impl PriceTimeMatching {
    /// Position of the most favourably priced crossing order.
    fn best_candidate(order: &Order, book: &OrderBook) -> Option<usize> {
        let mut best: Option<(usize, Decimal)> = None;

        for (position, resting) in book.iter().enumerate() {
            if !order.crosses(resting) {
                continue;
            }

            // Strict comparison keeps the earliest order on price ties.
            let better = match (best, order.side) {
                (None, _) => true,
                (Some((_, price)), Side::Buy) => resting.price < price,
                (Some((_, price)), Side::Sell) => resting.price > price,
            };

            if better {
                best = Some((position, resting.price));
            }
        }

        best.map(|(position, _)| position)
    }
}

impl MatchingPolicy for PriceTimeMatching {
    fn name(&self) -> &'static str {
        PolicyKind::PriceTime.as_str()
    }

    fn match_order(
        &self,
        order: &mut Order,
        book: &mut OrderBook,
    ) -> OrderBookResult<Vec<Fill>> {
        let mut fills = Vec::new();

        debug!(
            "Price-time matching {} {} @ {} against {} resting orders",
            order.side,
            order.quantity,
            order.price,
            book.len()
        );

        check_crossing_orders(order, book)?;

        while order.quantity > Decimal::ZERO {
            let position = match Self::best_candidate(order, book) {
                Some(position) => position,
                None => break,
            };

            let exhausted = match book.get_mut(position) {
                Some(resting) => {
                    fills.push(execute_fill(order, resting, position)?);
                    resting.quantity.is_zero()
                }
                None => break,
            };

            if exhausted {
                book.remove_at(position);
            }
        }

        Ok(fills)
    }
}

/// Fail if any order `order` could trade with has no open quantity.
///
/// Runs before the first fill so that an aborted pass changes nothing.
pub fn check_crossing_orders(order: &Order, book: &OrderBook) -> OrderBookResult<()> {
    if order.quantity <= Decimal::ZERO {
        return Ok(());
    }

    match book
        .iter()
        .enumerate()
        .find(|(_, resting)| order.crosses(resting) && resting.quantity <= Decimal::ZERO)
    {
        Some((position, resting)) => {
            error!(
                "Resting order {} at position {} has quantity {}",
                resting.id, position, resting.quantity
            );
            Err(OrderBookError::ArithmeticInvariantViolation {
                position,
                quantity: resting.quantity,
            })
        }
        None => Ok(()),
    }
}

/// Trade `min(incoming, resting)` at the resting order's price.
fn execute_fill(
    incoming: &mut Order,
    resting: &mut Order,
    position: usize,
) -> OrderBookResult<Fill> {
    if resting.quantity <= Decimal::ZERO {
        return Err(OrderBookError::ArithmeticInvariantViolation {
            position,
            quantity: resting.quantity,
        });
    }

    let fill_quantity = incoming.quantity.min(resting.quantity);
    incoming.quantity -= fill_quantity;
    resting.quantity -= fill_quantity;

    debug!(
        "Matched {} @ {} (resting {} left {})",
        fill_quantity, resting.price, resting.id, resting.quantity
    );

    Ok(Fill::new(incoming, resting, fill_quantity))
}

/// Named matching policies, as selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    ScanOrder,
    PriceTime,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn MatchingPolicy> {
        match self {
            PolicyKind::ScanOrder => Box::new(ScanOrderMatching),
            PolicyKind::PriceTime => Box::new(PriceTimeMatching),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::ScanOrder => "scan-order",
            PolicyKind::PriceTime => "price-time",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = OrderBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scan-order" => Ok(PolicyKind::ScanOrder),
            "price-time" => Ok(PolicyKind::PriceTime),
            other => Err(OrderBookError::Config(format!(
                "unknown matching policy '{}'",
                other
            ))),
        }
    }
}

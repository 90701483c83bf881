use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::orderbook::error::OrderBookError;

pub type OrderId = Uuid;
pub type Price = Decimal;
pub type Quantity = Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = OrderBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "b" => Ok(Side::Buy),
            "sell" | "s" => Ok(Side::Sell),
            other => Err(OrderBookError::InvalidOrder(format!(
                "unknown side '{}'",
                other
            ))),
        }
    }
}

/// An order, both as submitted and as stored in the book.
///
/// Only `quantity` changes after creation; it tracks what is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub original_quantity: Quantity,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            id: Uuid::new_v4(),
            side,
            price,
            quantity,
            original_quantity: quantity,
            created_at: Utc::now(),
        }
    }

    pub fn buy(price: Price, quantity: Quantity) -> Self {
        Self::new(Side::Buy, price, quantity)
    }

    pub fn sell(price: Price, quantity: Quantity) -> Self {
        Self::new(Side::Sell, price, quantity)
    }

    /// Whether this order, as the incoming side, may trade against `resting`.
    pub fn crosses(&self, resting: &Order) -> bool {
        resting.side == self.side.opposite()
            && match self.side {
                Side::Buy => self.price >= resting.price,
                Side::Sell => self.price <= resting.price,
            }
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.original_quantity - self.quantity
    }

    pub fn is_filled(&self) -> bool {
        self.quantity.is_zero()
    }
}

/// One pairwise exchange between the incoming order and a resting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub incoming_order_id: OrderId,
    pub resting_order_id: OrderId,
    pub incoming_side: Side,
    /// Always the resting order's price.
    pub price: Price,
    pub quantity: Quantity,
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    pub fn new(incoming: &Order, resting: &Order, quantity: Quantity) -> Self {
        Self {
            incoming_order_id: incoming.id,
            resting_order_id: resting.id,
            incoming_side: incoming.side,
            price: resting.price,
            quantity,
            timestamp: Utc::now(),
        }
    }

    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Fully matched, nothing rests.
    Filled,
    /// Matched in part; the remainder was appended to the book.
    PartiallyFilled,
    /// No fills; appended to the book unchanged.
    Resting,
    /// Zero quantity on arrival; neither matched nor stored.
    Discarded,
}

/// Outcome of a single submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The submitted order in its final state.
    pub order: Order,
    pub fills: Vec<Fill>,
    pub status: MatchStatus,
}

impl MatchResult {
    pub fn new(order: Order, fills: Vec<Fill>) -> Self {
        let status = match (order.quantity > Decimal::ZERO, fills.is_empty()) {
            (true, true) => MatchStatus::Resting,
            (true, false) => MatchStatus::PartiallyFilled,
            (false, true) => MatchStatus::Discarded,
            (false, false) => MatchStatus::Filled,
        };

        Self {
            order,
            fills,
            status,
        }
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.fills.iter().map(|f| f.quantity).sum()
    }

    pub fn rested(&self) -> bool {
        matches!(
            self.status,
            MatchStatus::Resting | MatchStatus::PartiallyFilled
        )
    }
}

/// A row of the book as shown to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl From<&Order> for BookEntry {
    fn from(order: &Order) -> Self {
        Self {
            side: order.side,
            price: order.price,
            quantity: order.quantity,
        }
    }
}

/// Raw, unvalidated order fields as typed into a form or a command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: String,
    pub price: String,
    pub quantity: String,
}

impl OrderRequest {
    pub fn new(
        side: impl Into<String>,
        price: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            side: side.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    /// Parse and validate into an `Order`. Rejects negative or unparsable numbers.
    pub fn into_order(self) -> Result<Order, OrderBookError> {
        let side: Side = self.side.parse()?;

        let price = Decimal::from_str(self.price.trim()).map_err(|e| {
            OrderBookError::InvalidOrder(format!("invalid price '{}': {}", self.price, e))
        })?;
        let quantity = Decimal::from_str(self.quantity.trim()).map_err(|e| {
            OrderBookError::InvalidOrder(format!("invalid quantity '{}': {}", self.quantity, e))
        })?;

        let order = Order::new(side, price, quantity);
        validate_order(&order)?;
        Ok(order)
    }
}

/// Boundary check applied before an order reaches the matcher.
pub fn validate_order(order: &Order) -> Result<(), OrderBookError> {
    if order.price < Decimal::ZERO {
        return Err(OrderBookError::InvalidOrder(format!(
            "negative price {}",
            order.price
        )));
    }

    if order.quantity < Decimal::ZERO {
        return Err(OrderBookError::InvalidOrder(format!(
            "negative quantity {}",
            order.quantity
        )));
    }

    Ok(())
}

use rust_decimal::Decimal;
use tracing::debug;

use crate::orderbook::error::{OrderBookError, OrderBookResult};
use crate::orderbook::types::{BookEntry, Order, Quantity, Side};

/// Resting orders of both sides in a single append-ordered list.
///
/// No price ordering is kept here. The position of an order is its scan
/// order during matching: earlier arrivals are examined first, and any
/// removal shifts later orders down by one.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Iterate resting orders in insertion order.
    ///
    /// Each call reads the book as it currently is.
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    pub fn get(&self, position: usize) -> Option<&Order> {
        self.orders.get(position)
    }

    /// Mutable access for matching policies, which reduce resting quantity
    /// in place.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Order> {
        self.orders.get_mut(position)
    }

    /// Remove the order at `position`; later orders shift down by one.
    ///
    /// Panics if `position` is out of bounds.
    pub fn remove_at(&mut self, position: usize) -> Order {
        let order = self.orders.remove(position);
        debug!("Removed order {} from position {}", order.id, position);
        order
    }

    /// Append a new order or the remainder of a partially filled one.
    pub fn append(&mut self, order: Order) {
        debug_assert!(
            order.quantity > Decimal::ZERO,
            "only orders with open quantity may rest"
        );
        debug!(
            "Resting {} {} @ {} at position {}",
            order.side,
            order.quantity,
            order.price,
            self.orders.len()
        );
        self.orders.push(order);
    }

    pub(crate) fn clear(&mut self) {
        self.orders.clear();
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of resting orders on one side.
    pub fn side_count(&self, side: Side) -> usize {
        self.orders.iter().filter(|o| o.side == side).count()
    }

    /// Total open quantity on one side.
    pub fn side_quantity(&self, side: Side) -> Quantity {
        self.orders
            .iter()
            .filter(|o| o.side == side)
            .map(|o| o.quantity)
            .sum()
    }

    /// Current contents as display rows, in scan order.
    pub fn snapshot(&self) -> Vec<BookEntry> {
        self.orders.iter().map(BookEntry::from).collect()
    }

    /// Check that every resting order has open quantity.
    pub fn validate(&self) -> OrderBookResult<()> {
        match self
            .orders
            .iter()
            .position(|o| o.quantity <= Decimal::ZERO)
        {
            Some(position) => Err(OrderBookError::ArithmeticInvariantViolation {
                position,
                quantity: self.orders[position].quantity,
            }),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a OrderBook {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBookError {
    /// Rejected at the boundary: negative price or quantity, unknown side,
    /// or a field that does not parse
    InvalidOrder(String),

    /// A resting order was found with quantity <= 0
    ArithmeticInvariantViolation { position: usize, quantity: Decimal },

    /// Configuration could not be read or parsed
    Config(String),
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidOrder(reason) => write!(f, "Invalid order: {}", reason),
            OrderBookError::ArithmeticInvariantViolation { position, quantity } => write!(
                f,
                "Resting order at position {} has non-positive quantity {}",
                position, quantity
            ),
            OrderBookError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for OrderBookError {}

/// Result type for order book operations
pub type OrderBookResult<T> = Result<T, OrderBookError>;

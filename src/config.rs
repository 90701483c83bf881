//! Engine configuration
//!
//! Settings come from an optional TOML file; anything missing falls back to
//! the defaults below.
//!
//! ```toml
//! policy = "price-time"
//! validate_orders = true
//! display_precision = 2
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::orderbook::error::{OrderBookError, OrderBookResult};
use crate::orderbook::matching::PolicyKind;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which matching policy the engine runs
    pub policy: PolicyKind,
    /// Reject negative prices/quantities in `try_submit`
    pub validate_orders: bool,
    /// Decimal places used when rendering the book and statistics
    pub display_precision: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::ScanOrder,
            validate_orders: true,
            display_precision: 2,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> OrderBookResult<Self> {
        toml::from_str(contents).map_err(|e| OrderBookError::Config(e.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> OrderBookResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OrderBookError::Config(format!("{}: {}", path.display(), e)))?;

        let config = Self::from_toml_str(&contents)?;
        info!("Loaded engine configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> OrderBookResult<Self> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.policy, PolicyKind::ScanOrder);
        assert!(config.validate_orders);
        assert_eq!(config.display_precision, 2);
        assert_eq!(EngineConfig::load(None).unwrap(), config);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str("policy = \"price-time\"").unwrap();
        assert_eq!(config.policy, PolicyKind::PriceTime);
        assert!(config.validate_orders);

        let config = EngineConfig::from_toml_str(
            "validate_orders = false\ndisplay_precision = 4",
        )
        .unwrap();
        assert_eq!(config.policy, PolicyKind::ScanOrder);
        assert!(!config.validate_orders);
        assert_eq!(config.display_precision, 4);
    }

    #[test]
    fn test_bad_config() {
        assert!(matches!(
            EngineConfig::from_toml_str("policy = \"best-effort\""),
            Err(OrderBookError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_file("/nonexistent/engine.toml"),
            Err(OrderBookError::Config(_))
        ));
    }
}

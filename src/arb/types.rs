use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Type alias for an exchange market symbol, e.g. `ethusd`.
pub type Symbol = String;

/// The direction of one trade leg within a cycle.
///
/// A leg SELLs when the cycle is disposing of the symbol's base currency and
/// BUYs when it is acquiring it. Persisted in lowercase in `config.json`.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Spend the quote currency to acquire the base currency at the ask
    #[display("buy")]
    Buy,
    /// Dispose of the base currency into the quote currency at the bid
    #[display("sell")]
    Sell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_serde_lowercase() {
        assert_eq!(serde_json::to_string(&OrderType::Buy).unwrap(), "\"buy\"");
        assert_eq!(
            serde_json::from_str::<OrderType>("\"sell\"").unwrap(),
            OrderType::Sell
        );
    }

    #[test]
    fn test_order_type_display() {
        assert_eq!(OrderType::Sell.to_string(), "sell");
    }
}

//! Maps abstract currency cycles onto the exchange's concrete market
//! symbols and trade directions.

use std::collections::HashSet;

use eyre::{bail, Result};
use itertools::Itertools;

use super::cycle::CycleKey;
use super::types::{OrderType, Symbol};

/// Resolves currency cycles against the set of symbols the exchange
/// actually trades.
#[derive(Debug)]
pub struct TickerResolver {
    /// All known market symbols
    tickers: HashSet<Symbol>,
}

impl TickerResolver {
    /// Creates a resolver over the known ticker set
    pub fn new(tickers: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            tickers: tickers.into_iter().collect(),
        }
    }

    /// Whether `ticker` is a known market symbol
    #[must_use]
    pub fn ticker_exists(&self, ticker: &str) -> bool {
        self.tickers.contains(ticker)
    }

    /// Resolves a cycle into the ordered market symbols of its legs.
    ///
    /// The cycle's currency sequence is closed by appending the first
    /// currency, and each consecutive pair `(c1, c2)` is matched against the
    /// ticker set as `c1+c2` first, then `c2+c1`.
    ///
    /// # Errors
    /// * If neither concatenation of some consecutive pair is a known ticker
    pub fn resolve_cycle(&self, key: &CycleKey) -> Result<Vec<Symbol>> {
        let mut currencies: Vec<&str> = key.currencies().iter().map(String::as_str).collect();
        currencies.push(currencies[0]);

        let mut path = Vec::with_capacity(key.len());
        for (c1, c2) in currencies.iter().tuple_windows() {
            let forward = format!("{c1}{c2}");
            let reverse = format!("{c2}{c1}");

            if self.ticker_exists(&forward) {
                path.push(forward);
            } else if self.ticker_exists(&reverse) {
                path.push(reverse);
            } else {
                bail!("no ticker joins {c1} and {c2}");
            }
        }

        Ok(path)
    }
}

/// Classifies the trade direction of one leg.
///
/// SELL when the symbol begins with the currency (the cycle is disposing of
/// that currency first), BUY when the currency appears elsewhere in the
/// symbol.
///
/// # Errors
/// * If the currency does not appear in the symbol at all
pub fn classify_leg(currency: &str, symbol: &str) -> Result<OrderType> {
    if !symbol.contains(currency) {
        bail!("invalid path: {symbol} does not trade {currency}");
    }

    if symbol.starts_with(currency) {
        Ok(OrderType::Sell)
    } else {
        Ok(OrderType::Buy)
    }
}

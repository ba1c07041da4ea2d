//! Compounded, fee-adjusted revaluation of one cycle against the current
//! top-of-book state.

use std::collections::HashSet;

use eyre::{bail, Result};

use super::book::BookCache;
use super::cycle::CycleKey;
use super::index::CycleConfig;
use super::types::{OrderType, Symbol};

/// The nominal notional every evaluation starts from
const START_AMOUNT: f64 = 1.0;

/// Taker fee rates in percent, with a reduced rate for a configured set of
/// symbols (typically fiat FX pairs).
#[derive(Debug, Default)]
pub struct FeeSchedule {
    /// Standard taker fee, in percent
    taker_fee: f64,
    /// Reduced taker fee, in percent
    taker_fee_reduced: f64,
    /// Symbols charged the reduced rate
    reduced_pairs: HashSet<Symbol>,
}

impl FeeSchedule {
    /// Creates a schedule from percent rates and the reduced-rate symbol set
    pub fn new(
        taker_fee: f64,
        taker_fee_reduced: f64,
        reduced_pairs: impl IntoIterator<Item = Symbol>,
    ) -> Self {
        Self {
            taker_fee,
            taker_fee_reduced,
            reduced_pairs: reduced_pairs.into_iter().collect(),
        }
    }

    /// The fee rate for `pair` as a fraction (percent / 100)
    #[must_use]
    pub fn fee(&self, pair: &str) -> f64 {
        if self.reduced_pairs.contains(pair) {
            self.taker_fee_reduced / 100.0
        } else {
            self.taker_fee / 100.0
        }
    }
}

/// One evaluation outcome: a cycle id and its percentage return.
#[derive(Clone, Debug, PartialEq)]
pub struct ArbitrageResult {
    /// The evaluated cycle
    pub cycle: CycleKey,
    /// Compounded, fee-adjusted return in percent
    pub pnl: f64,
}

/// Compounds a nominal notional of 1.0 through every leg of the cycle and
/// returns the percentage gain or loss.
///
/// Per leg: the taker fee is deducted, then a BUY converts at the ask and a
/// SELL at the bid. Prices come from the book cache; a symbol with no cached
/// book contributes zero-valued prices, which yields a degenerate (zero or
/// infinite) result rather than an error.
///
/// # Errors
/// * If some leg's symbol has no recorded order type — the config is
///   malformed and a zero return here would be indistinguishable from a
///   genuine breakeven cycle
pub fn evaluate(config: &CycleConfig, fees: &FeeSchedule, books: &BookCache) -> Result<f64> {
    let mut amount = START_AMOUNT;

    for pair in &config.pairs {
        let book = books.top1(pair);
        let after_fee = amount - amount * fees.fee(pair);

        amount = match config.order_type(pair) {
            Some(OrderType::Buy) => after_fee / book.ask_price,
            Some(OrderType::Sell) => after_fee * book.bid_price,
            None => bail!("cycle leg {pair} has no order type"),
        };
    }

    Ok((amount - START_AMOUNT) / START_AMOUNT * 100.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_fee_schedule_rates() {
        let fees = FeeSchedule::new(0.4, 0.2, ["eurusd".to_owned()]);

        assert!((fees.fee("ethusd") - 0.004).abs() < f64::EPSILON);
        assert!((fees.fee("eurusd") - 0.002).abs() < f64::EPSILON);
    }

    #[test]
    fn test_evaluate_compounds_to_five_percent() {
        // sell at bid 1.05, then two buys at ask 1.0: factors compound to 1.05
        let config = triangle_config();
        let fees = FeeSchedule::default();
        let mut books = BookCache::new();
        books.upsert(top1("ethusd", 1.05, 1.05));
        books.upsert(top1("btcusd", 1.0, 1.0));
        books.upsert(top1("ethbtc", 1.0, 1.0));

        let pnl = evaluate(&config, &fees, &books).unwrap();

        assert!((pnl - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_applies_fees_per_leg() {
        // flat prices; three 1% fees compound to 0.99^3
        let config = triangle_config();
        let fees = FeeSchedule::new(1.0, 1.0, Vec::new());
        let mut books = BookCache::new();
        books.upsert(top1("ethusd", 1.0, 1.0));
        books.upsert(top1("btcusd", 1.0, 1.0));
        books.upsert(top1("ethbtc", 1.0, 1.0));

        let pnl = evaluate(&config, &fees, &books).unwrap();

        let expected = (0.99_f64.powi(3) - 1.0) * 100.0;
        assert!((pnl - expected).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_reduced_fee_selection() {
        let config = triangle_config();
        // ethusd rides free on the reduced rate; the other two legs each
        // halve the notional at the standard rate
        let fees = FeeSchedule::new(50.0, 0.0, ["ethusd".to_owned()]);
        let mut books = BookCache::new();
        books.upsert(top1("ethusd", 1.0, 1.0));
        books.upsert(top1("btcusd", 1.0, 1.0));
        books.upsert(top1("ethbtc", 1.0, 1.0));

        let pnl = evaluate(&config, &fees, &books).unwrap();

        assert!((pnl + 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_missing_book_degenerates() {
        // ethbtc has no book: its BUY leg divides by a zero ask
        let config = triangle_config();
        let fees = FeeSchedule::default();
        let mut books = BookCache::new();
        books.upsert(top1("ethusd", 1.05, 1.05));
        books.upsert(top1("btcusd", 1.0, 1.0));

        let pnl = evaluate(&config, &fees, &books).unwrap();

        assert!(!pnl.is_finite());
    }

    #[test]
    fn test_evaluate_missing_order_type_is_an_error() {
        let mut config = triangle_config();
        config.types.remove("btcusd");
        let fees = FeeSchedule::default();
        let books = BookCache::new();

        let err = evaluate(&config, &fees, &books);
        assert_eq!(
            err.err().unwrap().to_string(),
            "cycle leg btcusd has no order type"
        );
    }
}

//! Latest known top-of-book per market symbol.

use std::collections::HashMap;

use super::types::Symbol;

/// Best bid and best ask for one market symbol.
///
/// The zero value (all prices and amounts 0.0) stands in for a symbol whose
/// book has not been seen yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Top1Book {
    /// The market symbol this book belongs to
    pub pair: Symbol,
    /// Best bid price
    pub bid_price: f64,
    /// Amount resting at the best bid
    pub bid_amount: f64,
    /// Best ask price
    pub ask_price: f64,
    /// Amount resting at the best ask
    pub ask_amount: f64,
}

/// Last-write-wins store of the newest `Top1Book` per symbol.
///
/// Owned exclusively by the event dispatcher's consumer; nothing else
/// mutates it. Entries are created on first update and never expire. No
/// ordering or timestamp comparison is done, so a late-arriving stale
/// update overwrites a fresher one.
#[derive(Debug, Default)]
pub struct BookCache {
    /// Latest book per market symbol
    books: HashMap<Symbol, Top1Book>,
}

impl BookCache {
    /// Creates an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached entry for the update's symbol
    pub fn upsert(&mut self, update: Top1Book) {
        self.books.insert(update.pair.clone(), update);
    }

    /// The latest book for `pair`, or the zero-valued book when the symbol
    /// has not been seen yet. Evaluating against the zero book produces a
    /// degenerate result rather than an error; see `evaluator`.
    #[must_use]
    pub fn top1(&self, pair: &str) -> Top1Book {
        self.books.get(pair).cloned().unwrap_or_default()
    }

    /// The latest book for `pair`, if one has been cached
    #[must_use]
    pub fn get(&self, pair: &str) -> Option<&Top1Book> {
        self.books.get(pair)
    }

    /// The number of symbols with a cached book
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether no book has been cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

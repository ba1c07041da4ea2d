//! One-shot order-book snapshots fetched over HTTP at startup.
//!
//! The streaming feed only pushes deltas for books that change, so each
//! tracked symbol gets an initial snapshot to seed the cache. This producer
//! runs once and exits; a failing symbol is logged and skipped.

use eyre::Result;
use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;

use super::wire::BookLevels;
use crate::arb::book::Top1Book;
use crate::arb::types::Symbol;

/// The exchange's order-book snapshot endpoint
pub const ORDER_BOOK_URL: &str = "https://www.bitstamp.net/api/v2/order_book";

/// Fetches one snapshot per symbol and forwards the tops of book onto the
/// delivery queue. Returns when every symbol has been attempted or the
/// receiver is gone.
pub async fn init_order_books(client: &Client, pairs: &[Symbol], tx: UnboundedSender<Top1Book>) {
    for pair in pairs {
        match fetch_book(client, pair).await {
            Ok(update) => {
                if tx.send(update).is_err() {
                    return;
                }
            }
            Err(e) => log::error!("{pair} init order book: {e}"),
        }
    }
}

/// Fetches and extracts the top of book for one symbol.
///
/// # Errors
/// * If the request fails or the body is not a valid book
async fn fetch_book(client: &Client, pair: &str) -> Result<Top1Book> {
    let levels: BookLevels = client
        .get(format!("{ORDER_BOOK_URL}/{pair}"))
        .send()
        .await?
        .json()
        .await?;

    levels.top1(pair)
}

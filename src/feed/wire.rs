//! Wire formats of the exchange's order-book feeds.
//!
//! The streaming protocol wraps every inbound message in an envelope
//! carrying `event` and `channel`; data events add `data.bids`/`data.asks`
//! as arrays of `[price, amount]` string pairs. The HTTP snapshot body is
//! the bare `bids`/`asks` object. Only index 0 of each side is consumed.

use eyre::{bail, Result};
use serde::Deserialize;
use serde_json::json;

use crate::arb::book::Top1Book;

/// Channel name prefix for order-book subscriptions
pub const CHANNEL_PREFIX: &str = "order_book_";
/// Event sent by the exchange to acknowledge a subscription
pub const EVENT_SUBSCRIPTION_SUCCEEDED: &str = "bts:subscription_succeeded";
/// Event carried by order-book data frames
pub const EVENT_DATA: &str = "data";

/// The outer frame every inbound streaming message carries
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Event discriminator
    #[serde(default)]
    pub event: String,
    /// Channel the message belongs to, e.g. `order_book_ethusd`
    #[serde(default)]
    pub channel: String,
}

/// A streaming order-book data frame
#[derive(Debug, Deserialize)]
pub struct BookFrame {
    /// The book levels payload
    pub data: BookLevels,
}

/// Price levels of one book side: `[price, amount]` string pairs, best
/// first. Shared between the streaming data frame payload and the HTTP
/// snapshot body.
#[derive(Debug, Deserialize)]
pub struct BookLevels {
    /// Bid levels, best bid at index 0
    pub bids: Vec<(String, String)>,
    /// Ask levels, best ask at index 0
    pub asks: Vec<(String, String)>,
}

impl BookLevels {
    /// Extracts the top of book for `pair`.
    ///
    /// # Errors
    /// * If either side has no levels
    /// * If a price or amount does not parse as a float
    pub fn top1(&self, pair: &str) -> Result<Top1Book> {
        let (bid_price, bid_amount) = Self::best(&self.bids, "bid")?;
        let (ask_price, ask_amount) = Self::best(&self.asks, "ask")?;

        Ok(Top1Book {
            pair: pair.to_owned(),
            bid_price,
            bid_amount,
            ask_price,
            ask_amount,
        })
    }

    /// Parses the level at index 0 of one side
    fn best(levels: &[(String, String)], side: &str) -> Result<(f64, f64)> {
        let Some((price, amount)) = levels.first() else {
            bail!("book has no {side} levels");
        };

        Ok((price.parse()?, amount.parse()?))
    }
}

/// The outbound subscribe frame for one symbol's order-book channel
#[must_use]
pub fn subscribe_frame(pair: &str) -> String {
    json!({
        "event": "bts:subscribe",
        "data": { "channel": format!("{CHANNEL_PREFIX}{pair}") }
    })
    .to_string()
}

/// The market symbol a channel name refers to
#[must_use]
pub fn channel_pair(channel: &str) -> &str {
    channel.strip_prefix(CHANNEL_PREFIX).unwrap_or(channel)
}

/// Interprets one raw streaming message.
///
/// Returns a book update for data frames and `None` for acknowledgements
/// and other events, which are only logged.
///
/// # Errors
/// * If the message is not valid JSON
/// * If a data frame's book cannot be parsed
pub fn handle_frame(raw: &str) -> Result<Option<Top1Book>> {
    let envelope: Envelope = serde_json::from_str(raw)?;

    match envelope.event.as_str() {
        EVENT_SUBSCRIPTION_SUCCEEDED => {
            log::info!("subscribed: {}", envelope.channel);
            Ok(None)
        }
        EVENT_DATA => {
            let frame: BookFrame = serde_json::from_str(raw)?;
            let pair = channel_pair(&envelope.channel);
            Ok(Some(frame.data.top1(pair)?))
        }
        _ => {
            log::debug!("unhandled frame: {raw}");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_frame_shape() {
        let frame: serde_json::Value =
            serde_json::from_str(&subscribe_frame("ethusd")).unwrap();

        assert_eq!(frame["event"], "bts:subscribe");
        assert_eq!(frame["data"]["channel"], "order_book_ethusd");
    }

    #[test]
    fn test_channel_pair_round_trip() {
        assert_eq!(channel_pair("order_book_ethusd"), "ethusd");
        assert_eq!(channel_pair("ethusd"), "ethusd");
    }

    #[test]
    fn test_handle_frame_data() {
        let raw = r#"{
            "event": "data",
            "channel": "order_book_ethusd",
            "data": {
                "bids": [["100.5", "2.0"], ["100.0", "1.0"]],
                "asks": [["101.5", "3.0"], ["102.0", "4.0"]]
            }
        }"#;

        let update = handle_frame(raw).unwrap().unwrap();

        assert_eq!(update.pair, "ethusd");
        assert_eq!(update.bid_price, 100.5);
        assert_eq!(update.bid_amount, 2.0);
        assert_eq!(update.ask_price, 101.5);
        assert_eq!(update.ask_amount, 3.0);
    }

    #[test]
    fn test_handle_frame_subscription_ack() {
        let raw = r#"{"event":"bts:subscription_succeeded","channel":"order_book_ethusd","data":{}}"#;

        assert!(handle_frame(raw).unwrap().is_none());
    }

    #[test]
    fn test_handle_frame_unknown_event() {
        let raw = r#"{"event":"bts:heartbeat","channel":"","data":{}}"#;

        assert!(handle_frame(raw).unwrap().is_none());
    }

    #[test]
    fn test_handle_frame_malformed_json() {
        assert!(handle_frame("not json").is_err());
    }

    #[test]
    fn test_handle_frame_empty_book_side() {
        let raw = r#"{
            "event": "data",
            "channel": "order_book_ethusd",
            "data": { "bids": [], "asks": [["101.5", "3.0"]] }
        }"#;

        let err = handle_frame(raw);
        assert_eq!(err.err().unwrap().to_string(), "book has no bid levels");
    }

    #[test]
    fn test_snapshot_body_parses_as_book_levels() {
        let raw = r#"{ "bids": [["0.071", "10"]], "asks": [["0.072", "5"]] }"#;

        let levels: BookLevels = serde_json::from_str(raw).unwrap();
        let book = levels.top1("ethbtc").unwrap();

        assert_eq!(book.pair, "ethbtc");
        assert_eq!(book.bid_price, 0.071);
        assert_eq!(book.ask_price, 0.072);
    }
}

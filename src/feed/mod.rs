//! Market-data producers: the live streaming transport and the one-time
//! HTTP snapshot fetch, plus the wire formats both speak.
//!
//! Producers only construct `Top1Book` values and send them onto the
//! dispatcher's delivery queue; they never touch the book cache.

/// Initial order-book snapshots over HTTP
pub mod snapshot;
/// Websocket connection, subscription and reader
pub mod stream;
/// Frame formats and top-of-book extraction
pub mod wire;

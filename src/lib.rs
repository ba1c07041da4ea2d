/*!
 * # Cyclescan - Triangular Arbitrage Detection
 *
 * Cyclescan is a Rust-based scanner that detects triangular arbitrage
 * opportunities among crypto trading pairs on a single exchange.
 *
 * ## Core Features
 *
 * - **Cycle Enumeration**: Statically enumerates fixed-length conversion
 *   loops from the exchange's tradable-pair graph
 * - **Live Revaluation**: Maintains a top-of-book cache from the streaming
 *   feed and recomputes profitability only for the cycles each update
 *   affects
 * - **Alerting**: Reports fee-adjusted returns above a threshold to the
 *   console and, optionally, to Slack
 *
 * ## Module Structure
 *
 * - `arb`: Graph, cycle enumeration, resolution, book cache and evaluator
 * - `bot`: The event dispatcher running the single-consumer loop
 * - `config`: Environment settings, seed files and persisted artifacts
 * - `feed`: Streaming and snapshot market-data producers
 * - `notify`: Alerting collaborators
 * - `utils`: Utility functions and helpers
 */

/// Graph, cycle enumeration and valuation logic
pub mod arb;
/// The event dispatcher
pub mod bot;
/// Settings, seed files and persisted artifacts
pub mod config;
/// Market-data producers
pub mod feed;
/// Alerting collaborators
pub mod notify;
/// Utility functions and helpers
pub mod utils;

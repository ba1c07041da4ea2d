//! The event dispatcher: a single consumer that owns the book cache and
//! revalues only the cycles affected by each market update.
//!
//! Producers (the live stream reader and the one-time snapshot fetcher) run
//! independently and only send `Top1Book` values onto one shared, ordered
//! delivery queue. The consumer drains the queue alone, so neither the book
//! cache nor the read-only index needs a lock. The queue is unbounded:
//! under sustained overload it grows without limit rather than applying
//! backpressure.

use std::time::Duration;

use eyre::{bail, Result};
use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::arb::book::{BookCache, Top1Book};
use crate::arb::evaluator::{evaluate, ArbitrageResult, FeeSchedule};
use crate::arb::index::ArbitrageIndex;
use crate::arb::types::Symbol;
use crate::feed::{snapshot, stream};
use crate::notify::SlackNotifier;

/// How long shutdown waits after sending the close frame. Producers are not
/// joined; shutdown is best-effort.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// The scanning engine: the read-only arbitrage index, the fee schedule,
/// and the book cache only this instance's consumer loop mutates.
pub struct Bot {
    /// Cycle configs plus the symbol-to-cycles reverse index
    index: ArbitrageIndex,
    /// Taker fee rates
    fees: FeeSchedule,
    /// Latest top-of-book per symbol, owned by the consumer
    books: BookCache,
    /// Alert threshold in percent
    min_pnl: f64,
    /// Optional alerting collaborator
    notifier: Option<SlackNotifier>,
}

impl Bot {
    /// Creates a bot over an assembled index
    #[must_use]
    pub fn new(
        index: ArbitrageIndex,
        fees: FeeSchedule,
        min_pnl: f64,
        notifier: Option<SlackNotifier>,
    ) -> Self {
        Self {
            index,
            fees,
            books: BookCache::new(),
            min_pnl,
            notifier,
        }
    }

    /// The book cache as the consumer last left it
    #[must_use]
    pub fn books(&self) -> &BookCache {
        &self.books
    }

    /// Caches one update, then revalues exactly the cycles whose configs
    /// reference the updated symbol. Returns every evaluation, qualifying
    /// or not; the caller applies the alert threshold.
    ///
    /// # Errors
    /// * If the pair index references a cycle with no config
    /// * If some evaluated cycle's config is malformed
    pub fn apply_update(&mut self, update: Top1Book) -> Result<Vec<ArbitrageResult>> {
        let pair = update.pair.clone();
        self.books.upsert(update);

        let mut results = Vec::new();
        for key in self.index.cycles_for(&pair) {
            let Some(config) = self.index.config(key) else {
                bail!("pair index references unknown cycle {key}");
            };

            let pnl = evaluate(config, &self.fees, &self.books)?;
            results.push(ArbitrageResult {
                cycle: key.clone(),
                pnl,
            });
        }

        Ok(results)
    }

    /// Connects to the exchange, spawns the producers, subscribes, and runs
    /// the consumer loop until the stream ends or an interrupt arrives.
    ///
    /// # Errors
    /// * If the connection or subscription phase fails
    /// * If the consumer hits a malformed config (see [`Self::apply_update`])
    pub async fn run(mut self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let ws = stream::connect().await?;
        let (mut write, read) = ws.split();

        let symbols: Vec<Symbol> = self.index.symbols().cloned().collect();

        // async: init order books
        let snapshot_tx = tx.clone();
        let snapshot_symbols = symbols.clone();
        tokio::spawn(async move {
            let client = reqwest::Client::new();
            snapshot::init_order_books(&client, &snapshot_symbols, snapshot_tx).await;
        });

        // task: read stream msgs
        tokio::spawn(stream::read_books(read, tx));

        stream::subscribe(&mut write, &symbols).await?;
        info!("scanning {} cycles over {} symbols", self.index.len(), symbols.len());

        loop {
            tokio::select! {
                update = rx.recv() => {
                    let Some(update) = update else {
                        info!("all producers stopped");
                        break;
                    };

                    for result in self.apply_update(update)? {
                        if result.pnl > self.min_pnl {
                            self.alert(&result).await;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt triggered by user");

                    if let Err(e) = write.send(Message::Close(None)).await {
                        error!("close: {e}");
                    }
                    tokio::time::sleep(CLOSE_GRACE).await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reports one qualifying result to the console and, when configured,
    /// to Slack
    async fn alert(&self, result: &ArbitrageResult) {
        warn!("{} {:.4}%", result.cycle, result.pnl);

        if let Some(notifier) = &self.notifier {
            let msg = format!("{} returns {:.4}%", result.cycle, result.pnl);
            if let Err(e) = notifier.send(&msg).await {
                error!("slack notify: {e}");
            }
        }
    }
}

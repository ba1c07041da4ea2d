//! Command-line entry points wiring the enumeration pass and the scanner.

use std::time::Duration;

use clap::{Parser, Subcommand};
use eyre::Result;
use indicatif::ProgressBar;
use log::info;

use cyclescan::arb::cycle::enumerate_cycles;
use cyclescan::arb::evaluator::FeeSchedule;
use cyclescan::arb::graph::Graph;
use cyclescan::arb::index::ArbitrageIndex;
use cyclescan::arb::resolver::TickerResolver;
use cyclescan::bot::Bot;
use cyclescan::config::{self, Settings};
use cyclescan::notify::SlackNotifier;
use cyclescan::utils::logger::setup_logger;

/// Command-line interface
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The selected subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Enumerate cycles and persist the tradeable configs
    FindCycles,
    /// Scan live order books against the persisted configs
    Scan,
    /// Send slack message
    Slack {
        /// Message text
        message: String,
    },
    /// Send slack error message
    SlackError {
        /// Message text
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_logger()?;

    let settings = Settings::from_env()?;

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::FindCycles) => {
            find_cycles(&settings)?;
        }
        Some(Commands::Scan) => {
            scan(&settings).await?;
        }
        Some(Commands::Slack { message }) => {
            SlackNotifier::new()?.send(&message).await?;
        }
        Some(Commands::SlackError { message }) => {
            SlackNotifier::new()?.send_error(&message).await?;
        }
        None => {
            // Default behavior when no subcommand is provided
            find_cycles(&settings)?;
            scan(&settings).await?;
        }
    }

    Ok(())
}

/// Builds the pair graph from the seed files, enumerates cycles of the
/// configured length, assembles the index and persists both artifacts.
fn find_cycles(settings: &Settings) -> Result<()> {
    let pairs = config::load_pairs(&settings.pairs_path)?;
    let tickers = config::load_tickers(&settings.tickers_path)?;

    let graph = Graph::from_pairs(&pairs)?;
    let resolver = TickerResolver::new(tickers);

    let spinner = ProgressBar::new_spinner().with_message("enumerating cycles...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let cycles = enumerate_cycles(&graph, settings.cycle_length);
    spinner.finish_and_clear();

    let index = ArbitrageIndex::assemble(&cycles, &resolver)?;

    config::store_cycle_configs(&settings.config_path, index.configs())?;
    config::store_pair_cycles(&settings.pair_cycles_path, index.pair_index())?;

    info!(
        "found {} cycles over {} symbols",
        index.len(),
        index.pair_index().len()
    );

    Ok(())
}

/// Loads the persisted artifacts and fee configuration, then runs the
/// dispatcher until the stream ends or the user interrupts.
async fn scan(settings: &Settings) -> Result<()> {
    let configs = config::load_cycle_configs(&settings.config_path)?;
    let pair_cycles = config::load_pair_cycles(&settings.pair_cycles_path)?;
    let fx_pairs = config::load_fx_pairs(&settings.fx_path)?;
    let (taker_fee, taker_fee_reduced) = config::taker_fees_from_env()?;

    let index = ArbitrageIndex::new(configs, pair_cycles);
    let fees = FeeSchedule::new(taker_fee, taker_fee_reduced, fx_pairs);

    let notifier = match SlackNotifier::new() {
        Ok(notifier) => Some(notifier),
        Err(_) => {
            info!("slack notifications disabled");
            None
        }
    };

    let bot = Bot::new(index, fees, settings.min_pnl, notifier);
    bot.run().await
}

//! Environment settings, seed files and the persisted cycle artifacts.
//!
//! Two seed files describe the exchange: `pairs.json`, a JSON array of
//! 2-element currency-code arrays forming the pair graph's edge list, and
//! `tickers.txt`, a comma-delimited list of tradable market symbols. The
//! `find-cycles` pass persists its output as `config.json` (cycle id to
//! `CycleConfig`) and `pair-cycles.json` (symbol to cycle ids); the scanner
//! reads those back. `fx.json` lists the symbols charged the reduced taker
//! fee.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

use crate::arb::cycle::CycleKey;
use crate::arb::index::CycleConfig;
use crate::arb::types::Symbol;

/// Cycle length used when `CYCLE_LENGTH` is not set
const DEFAULT_CYCLE_LENGTH: usize = 3;

/// File locations and scan parameters, read from the environment with the
/// conventional defaults. Fees are read separately by the scanner; see
/// [`taker_fees_from_env`].
#[derive(Debug)]
pub struct Settings {
    /// Edge-list seed file (`PAIRS_PATH`)
    pub pairs_path: PathBuf,
    /// Known-symbol seed file (`TICKERS_PATH`)
    pub tickers_path: PathBuf,
    /// Reduced-fee symbol list (`FX_PATH`)
    pub fx_path: PathBuf,
    /// Persisted cycle-config store (`CONFIG_PATH`)
    pub config_path: PathBuf,
    /// Persisted symbol-to-cycles index (`PAIR_CYCLES_PATH`)
    pub pair_cycles_path: PathBuf,
    /// Fixed cycle length to enumerate (`CYCLE_LENGTH`)
    pub cycle_length: usize,
    /// Alert threshold in percent (`MIN_PNL`)
    pub min_pnl: f64,
}

impl Settings {
    /// Reads settings from the environment, falling back to the defaults.
    ///
    /// # Errors
    /// * If `CYCLE_LENGTH` or `MIN_PNL` is set but does not parse
    pub fn from_env() -> Result<Self> {
        let cycle_length = match env::var("CYCLE_LENGTH") {
            Ok(raw) => raw.parse().wrap_err("parse CYCLE_LENGTH")?,
            Err(_) => DEFAULT_CYCLE_LENGTH,
        };

        let min_pnl = match env::var("MIN_PNL") {
            Ok(raw) => raw.parse().wrap_err("parse MIN_PNL")?,
            Err(_) => 0.0,
        };

        Ok(Self {
            pairs_path: path_var("PAIRS_PATH", "pairs.json"),
            tickers_path: path_var("TICKERS_PATH", "tickers.txt"),
            fx_path: path_var("FX_PATH", "fx.json"),
            config_path: path_var("CONFIG_PATH", "config.json"),
            pair_cycles_path: path_var("PAIR_CYCLES_PATH", "pair-cycles.json"),
            cycle_length,
            min_pnl,
        })
    }
}

/// A path from the environment, or its default
fn path_var(name: &str, default: &str) -> PathBuf {
    env::var(name).map_or_else(|_| PathBuf::from(default), PathBuf::from)
}

/// The standard and reduced taker fee rates, in percent.
///
/// # Errors
/// * If `TAKER_FEE` or `TAKER_FEE_REDUCED` is unset or does not parse
pub fn taker_fees_from_env() -> Result<(f64, f64)> {
    let taker_fee = env::var("TAKER_FEE")
        .wrap_err("TAKER_FEE must be set")?
        .parse()
        .wrap_err("parse TAKER_FEE")?;
    let taker_fee_reduced = env::var("TAKER_FEE_REDUCED")
        .wrap_err("TAKER_FEE_REDUCED must be set")?
        .parse()
        .wrap_err("parse TAKER_FEE_REDUCED")?;

    Ok((taker_fee, taker_fee_reduced))
}

/// Loads the pair-graph edge list.
///
/// # Errors
/// * If the file cannot be read or parsed
pub fn load_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    parse_pairs(&read(path)?)
}

/// Parses a JSON array of 2-element currency-code arrays.
///
/// # Errors
/// * If the JSON does not match the edge-list shape
pub fn parse_pairs(raw: &str) -> Result<Vec<(String, String)>> {
    serde_json::from_str(raw).wrap_err("parse pairs")
}

/// Loads the known market symbols.
///
/// # Errors
/// * If the file cannot be read
pub fn load_tickers(path: &Path) -> Result<Vec<Symbol>> {
    Ok(parse_tickers(&read(path)?))
}

/// Parses a comma-delimited symbol list, dropping surrounding whitespace
/// and empty entries
#[must_use]
pub fn parse_tickers(raw: &str) -> Vec<Symbol> {
    raw.split(',')
        .map(str::trim)
        .filter(|ticker| !ticker.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Loads the reduced-fee symbol list, lowercasing each entry.
///
/// # Errors
/// * If the file cannot be read or parsed
pub fn load_fx_pairs(path: &Path) -> Result<Vec<Symbol>> {
    parse_fx_pairs(&read(path)?)
}

/// Parses a JSON array of symbols, lowercasing each entry.
///
/// # Errors
/// * If the JSON is not an array of strings
pub fn parse_fx_pairs(raw: &str) -> Result<Vec<Symbol>> {
    let pairs: Vec<Symbol> = serde_json::from_str(raw).wrap_err("parse fx pairs")?;
    Ok(pairs.into_iter().map(|p| p.to_lowercase()).collect())
}

/// Loads the persisted cycle-config store.
///
/// # Errors
/// * If the file cannot be read or parsed
pub fn load_cycle_configs(path: &Path) -> Result<HashMap<CycleKey, CycleConfig>> {
    serde_json::from_str(&read(path)?).wrap_err("parse cycle configs")
}

/// Loads the persisted symbol-to-cycles index.
///
/// # Errors
/// * If the file cannot be read or parsed
pub fn load_pair_cycles(path: &Path) -> Result<HashMap<Symbol, Vec<CycleKey>>> {
    serde_json::from_str(&read(path)?).wrap_err("parse pair cycles")
}

/// Persists the cycle-config store as pretty-printed JSON.
///
/// # Errors
/// * If serialization or the write fails
pub fn store_cycle_configs(path: &Path, configs: &HashMap<CycleKey, CycleConfig>) -> Result<()> {
    write(path, &serde_json::to_string_pretty(configs)?)
}

/// Persists the symbol-to-cycles index as pretty-printed JSON.
///
/// # Errors
/// * If serialization or the write fails
pub fn store_pair_cycles(path: &Path, index: &HashMap<Symbol, Vec<CycleKey>>) -> Result<()> {
    write(path, &serde_json::to_string_pretty(index)?)
}

/// Reads a whole file, wrapping the error with the path
fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("read {}", path.display()))
}

/// Writes a whole file, wrapping the error with the path
fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).wrap_err_with(|| format!("write {}", path.display()))
}

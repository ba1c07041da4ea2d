//! Resolved cycle configurations and the reverse index from market symbol
//! to the cycles that trade it.
//!
//! Assembly happens once, offline, and is fail-fast: a single cycle that
//! cannot be resolved or classified aborts the whole batch. After assembly
//! the index is read-only shared state.

use std::collections::HashMap;

use eyre::{bail, Result};
use serde::{Deserialize, Serialize};

use super::cycle::CycleKey;
use super::resolver::{classify_leg, TickerResolver};
use super::types::{OrderType, Symbol};

/// The tradeable form of one cycle: the ordered market symbols of its legs
/// and the trade direction per symbol.
///
/// Serializes to the persisted `config.json` value shape:
/// `{ "pairs": [symbol...], "types": { symbol: "buy"|"sell" } }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// The market symbols of the legs, in trade order
    pub pairs: Vec<Symbol>,
    /// Trade direction per market symbol
    pub types: HashMap<Symbol, OrderType>,
}

impl CycleConfig {
    /// Builds the config for one cycle from its resolved ticker path.
    ///
    /// Classifies each leg against the currency it disposes of or acquires.
    /// The path must have one symbol per currency in the cycle.
    ///
    /// # Errors
    /// * If the path length does not match the cycle length
    /// * If some currency does not appear in its leg's symbol
    pub fn for_cycle(key: &CycleKey, path: Vec<Symbol>) -> Result<Self> {
        if path.len() != key.len() {
            bail!(
                "cycle {key} has {} legs but path has {}",
                key.len(),
                path.len()
            );
        }

        let mut types = HashMap::with_capacity(path.len());
        for (currency, pair) in key.currencies().iter().zip(&path) {
            types.insert(pair.clone(), classify_leg(currency, pair)?);
        }

        Ok(Self { pairs: path, types })
    }

    /// The trade direction of `pair` within this cycle
    #[must_use]
    pub fn order_type(&self, pair: &str) -> Option<OrderType> {
        self.types.get(pair).copied()
    }
}

/// All resolved cycle configurations plus the reverse index from market
/// symbol to the ids of the cycles that reference it.
#[derive(Debug, Default)]
pub struct ArbitrageIndex {
    /// Cycle id to its tradeable configuration
    configs: HashMap<CycleKey, CycleConfig>,
    /// Market symbol to the cycles whose configs reference it
    pair_to_cycles: HashMap<Symbol, Vec<CycleKey>>,
}

impl ArbitrageIndex {
    /// Rebuilds an index from its two persisted artifacts
    #[must_use]
    pub fn new(
        configs: HashMap<CycleKey, CycleConfig>,
        pair_to_cycles: HashMap<Symbol, Vec<CycleKey>>,
    ) -> Self {
        Self {
            configs,
            pair_to_cycles,
        }
    }

    /// Resolves and classifies every discovered cycle, then registers each
    /// config under all the symbols it references.
    ///
    /// Registration is idempotent: a cycle id is listed at most once per
    /// symbol. Assembly is fail-fast; there are no partial results.
    ///
    /// # Errors
    /// * If any cycle's ticker sequence cannot be resolved
    /// * If any leg cannot be classified
    pub fn assemble(
        cycles: &HashMap<CycleKey, String>,
        resolver: &TickerResolver,
    ) -> Result<Self> {
        let mut index = Self::default();

        for key in cycles.keys() {
            let path = resolver.resolve_cycle(key)?;
            let config = CycleConfig::for_cycle(key, path)?;
            index.register(key.clone(), config);
        }

        Ok(index)
    }

    /// Adds one cycle config, indexing it under every symbol it references
    fn register(&mut self, key: CycleKey, config: CycleConfig) {
        for pair in &config.pairs {
            let cycles = self.pair_to_cycles.entry(pair.clone()).or_default();
            if !cycles.contains(&key) {
                cycles.push(key.clone());
            }
        }

        self.configs.insert(key, config);
    }

    /// The config for `key`, if the cycle is known
    #[must_use]
    pub fn config(&self, key: &CycleKey) -> Option<&CycleConfig> {
        self.configs.get(key)
    }

    /// All cycle configs, keyed by cycle id
    #[must_use]
    pub fn configs(&self) -> &HashMap<CycleKey, CycleConfig> {
        &self.configs
    }

    /// The ids of the cycles that trade `pair`. Unindexed symbols yield an
    /// empty slice.
    #[must_use]
    pub fn cycles_for(&self, pair: &str) -> &[CycleKey] {
        self.pair_to_cycles
            .get(pair)
            .map_or(&[], Vec::as_slice)
    }

    /// The reverse index, keyed by market symbol
    #[must_use]
    pub fn pair_index(&self) -> &HashMap<Symbol, Vec<CycleKey>> {
        &self.pair_to_cycles
    }

    /// All market symbols any cycle references
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.pair_to_cycles.keys()
    }

    /// The number of indexed cycles
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether the index holds no cycles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::cycle::enumerate_cycles;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_cycle_config_for_cycle() {
        let key = cycle_key(&["eth", "usd", "btc"]);
        let path = vec![
            "ethusd".to_owned(),
            "btcusd".to_owned(),
            "ethbtc".to_owned(),
        ];

        let config = CycleConfig::for_cycle(&key, path).unwrap();

        assert_eq!(config.pairs, vec!["ethusd", "btcusd", "ethbtc"]);
        assert_eq!(config.order_type("ethusd"), Some(OrderType::Sell));
        assert_eq!(config.order_type("btcusd"), Some(OrderType::Buy));
        assert_eq!(config.order_type("ethbtc"), Some(OrderType::Buy));
    }

    #[test]
    fn test_cycle_config_length_mismatch() {
        let key = cycle_key(&["eth", "usd", "btc"]);

        let err = CycleConfig::for_cycle(&key, vec!["ethusd".to_owned()]);
        assert_eq!(
            err.err().unwrap().to_string(),
            "cycle eth-usd-btc has 3 legs but path has 1"
        );
    }

    #[test]
    fn test_cycle_config_serde_shape() {
        let key = cycle_key(&["eth", "usd", "btc"]);
        let config = CycleConfig::for_cycle(
            &key,
            vec![
                "ethusd".to_owned(),
                "btcusd".to_owned(),
                "ethbtc".to_owned(),
            ],
        )
        .unwrap();

        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["pairs"][0], "ethusd");
        assert_eq!(json["types"]["ethusd"], "sell");
        assert_eq!(json["types"]["btcusd"], "buy");

        let back: CycleConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_assemble_end_to_end() {
        let cycles = enumerate_cycles(&triangle(), 3);
        let resolver = resolver(&["ethusd", "btcusd", "ethbtc"]);

        let index = ArbitrageIndex::assemble(&cycles, &resolver).unwrap();

        // all discovered rotations describe the one geometric cycle
        assert!(!index.is_empty());
        for config in index.configs().values() {
            assert_eq!(config.pairs.len(), 3);
        }

        // every symbol of the triangle points back at the cycles that use it
        for pair in ["ethusd", "btcusd", "ethbtc"] {
            assert_eq!(index.cycles_for(pair).len(), index.len());
        }
    }

    #[test]
    fn test_registration_is_idempotent() {
        let key = cycle_key(&["eth", "usd", "btc"]);
        let path = vec![
            "ethusd".to_owned(),
            "btcusd".to_owned(),
            "ethbtc".to_owned(),
        ];
        let config = CycleConfig::for_cycle(&key, path).unwrap();

        let mut index = ArbitrageIndex::default();
        index.register(key.clone(), config.clone());
        index.register(key.clone(), config);

        assert_eq!(index.cycles_for("ethusd"), &[key]);
    }

    #[test]
    fn test_assemble_fails_fast() {
        let cycles = enumerate_cycles(&triangle(), 3);
        // ethbtc missing: no cycle resolves, and nothing is kept
        let resolver = resolver(&["ethusd", "btcusd"]);

        let err = ArbitrageIndex::assemble(&cycles, &resolver);
        assert!(err
            .err()
            .unwrap()
            .to_string()
            .starts_with("no ticker joins"));
    }

    #[test]
    fn test_cycles_for_unknown_pair() {
        let index = ArbitrageIndex::default();

        assert!(index.cycles_for("ethusd").is_empty());
    }
}

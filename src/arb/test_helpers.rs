use std::collections::HashMap;

use super::book::Top1Book;
use super::cycle::CycleKey;
use super::graph::Graph;
use super::index::CycleConfig;
use super::resolver::TickerResolver;
use super::types::OrderType;

#[allow(dead_code)]
pub fn pairs(edges: &[(&str, &str)]) -> Vec<(String, String)> {
    edges
        .iter()
        .map(|(a, b)| ((*a).to_owned(), (*b).to_owned()))
        .collect()
}

#[allow(dead_code)]
pub fn graph_of(edges: &[(&str, &str)]) -> Graph {
    #[allow(clippy::unwrap_used)]
    Graph::from_pairs(&pairs(edges)).unwrap()
}

#[allow(dead_code)]
pub fn triangle() -> Graph {
    graph_of(&[("eth", "usd"), ("usd", "btc"), ("btc", "eth")])
}

#[allow(dead_code)]
pub fn cycle_key(currencies: &[&str]) -> CycleKey {
    #[allow(clippy::unwrap_used)]
    CycleKey::new(currencies.iter().map(|c| (*c).to_owned()).collect()).unwrap()
}

#[allow(dead_code)]
pub fn resolver(tickers: &[&str]) -> TickerResolver {
    TickerResolver::new(tickers.iter().map(|t| (*t).to_owned()))
}

#[allow(dead_code)]
pub fn top1(pair: &str, bid: f64, ask: f64) -> Top1Book {
    Top1Book {
        pair: pair.to_owned(),
        bid_price: bid,
        bid_amount: 1.0,
        ask_price: ask,
        ask_amount: 1.0,
    }
}

#[allow(dead_code)]
pub fn triangle_config() -> CycleConfig {
    CycleConfig {
        pairs: vec![
            "ethusd".to_owned(),
            "btcusd".to_owned(),
            "ethbtc".to_owned(),
        ],
        types: HashMap::from([
            ("ethusd".to_owned(), OrderType::Sell),
            ("btcusd".to_owned(), OrderType::Buy),
            ("ethbtc".to_owned(), OrderType::Buy),
        ]),
    }
}

/// The lexicographically smallest rotation over both orientations. Two keys
/// describe the same geometric cycle iff their canonical forms match.
#[allow(dead_code)]
pub fn canonicalize(key: &CycleKey) -> Vec<String> {
    let forward = key.currencies().to_vec();
    let mut backward = forward.clone();
    backward.reverse();

    let mut best = forward.clone();
    for seq in [forward, backward] {
        for i in 0..seq.len() {
            let mut rotated = seq.clone();
            rotated.rotate_left(i);
            if rotated < best {
                best = rotated;
            }
        }
    }

    best
}

#[allow(dead_code)]
pub fn is_rotation_of(key: &CycleKey, currencies: &[&str]) -> bool {
    canonicalize(key) == canonicalize(&cycle_key(currencies))
}

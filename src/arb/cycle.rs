//! Depth-first enumeration of fixed-length currency cycles.
//!
//! A cycle is identified by its literal ordered vertex sequence as
//! discovered. Distinct rotations of the same geometric cycle are NOT
//! collapsed: every start vertex and traversal order that encounters the
//! loop registers its own rotation. Downstream consumers treat each
//! rotation as an independent trading loop with its own starting leg.

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};

use eyre::{bail, Result};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::graph::Graph;

/// A cycle identity: the ordered currency sequence as discovered, implicitly
/// closed (the last currency converts back into the first).
///
/// The key is compared structurally, so two cycles collide only when their
/// ordered sequences are identical. It renders as the `-`-joined currency
/// list (`eth-usd-btc`), which is also its persisted JSON form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycleKey(Vec<String>);

impl CycleKey {
    /// Creates a key from an ordered currency sequence.
    ///
    /// # Errors
    /// * If the sequence is empty
    pub fn new(currencies: Vec<String>) -> Result<Self> {
        if currencies.is_empty() {
            bail!("cycle key must not be empty");
        }

        Ok(Self(currencies))
    }

    /// Parses a `-`-joined currency list, e.g. `eth-usd-btc`.
    ///
    /// # Errors
    /// * If the string is empty or contains an empty segment
    pub fn parse(key: &str) -> Result<Self> {
        let currencies: Vec<String> = key.split('-').map(str::to_owned).collect();

        if currencies.iter().any(String::is_empty) {
            bail!("invalid cycle key: {key}");
        }

        Self::new(currencies)
    }

    /// The ordered currency codes of this cycle
    #[must_use]
    pub fn currencies(&self) -> &[String] {
        &self.0
    }

    /// The number of currencies in the cycle
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key holds no currencies. Never true for a constructed key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for CycleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("-"))
    }
}

impl Debug for CycleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cycle({self})")
    }
}

impl Serialize for CycleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CycleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::parse(&key).map_err(de::Error::custom)
    }
}

/// Enumerates all simple closed walks of exactly `length` vertices.
///
/// Runs a depth-first exploration from every vertex as a start point. The
/// active simple path is an explicit structure (`path` plus an `on_path`
/// membership vector) with a push-before-recurse / pop-after-return
/// discipline, so the search has no side effects outside of it and can be
/// parallelized per start vertex if that ever becomes worthwhile.
///
/// Returns a map from cycle key to the closing vertex of that rotation.
/// Recursion depth is bounded by the active path length, which cannot exceed
/// the graph's vertex count.
#[must_use]
pub fn enumerate_cycles(graph: &Graph, length: usize) -> HashMap<CycleKey, String> {
    let mut cycles = HashMap::new();

    let mut path = Vec::with_capacity(graph.len());
    let mut on_path = vec![false; graph.len()];

    for start in 0..graph.len() {
        dfs(graph, start, length, &mut path, &mut on_path, &mut cycles);
    }

    cycles
}

/// One DFS step. `path` holds the vertices of the current, not-yet-backtracked
/// recursion branch; `on_path` mirrors its membership for O(1) lookups.
fn dfs(
    graph: &Graph,
    vertex: usize,
    length: usize,
    path: &mut Vec<usize>,
    on_path: &mut Vec<bool>,
    cycles: &mut HashMap<CycleKey, String>,
) {
    on_path[vertex] = true;
    path.push(vertex);

    for &neighbor in graph.vertex(vertex).adjacent() {
        let is_predecessor = path.len() >= 2 && path[path.len() - 2] == neighbor;

        if on_path[neighbor] && !is_predecessor {
            // the distance along the active path back to the neighbor is the
            // closed walk length
            if let Some(pos) = path.iter().position(|&v| v == neighbor) {
                if path.len() - pos == length {
                    let currencies = path[pos..]
                        .iter()
                        .map(|&v| graph.vertex(v).key().to_owned())
                        .collect();
                    cycles.insert(
                        CycleKey(currencies),
                        graph.vertex(neighbor).key().to_owned(),
                    );
                }
            }
        } else if !on_path[neighbor] {
            dfs(graph, neighbor, length, path, on_path, cycles);
        }
    }

    path.pop();
    on_path[vertex] = false;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_cycle_key_display_and_parse() {
        let key = CycleKey::parse("eth-usd-btc").unwrap();

        assert_eq!(key.currencies(), &["eth", "usd", "btc"]);
        assert_eq!(key.to_string(), "eth-usd-btc");
    }

    #[test]
    fn test_cycle_key_parse_invalid() {
        let err = CycleKey::parse("eth--btc");
        assert_eq!(
            err.err().unwrap().to_string(),
            "invalid cycle key: eth--btc"
        );
    }

    #[test]
    fn test_cycle_key_structural_equality() {
        let key1 = cycle_key(&["eth", "usd", "btc"]);
        let key2 = CycleKey::parse("eth-usd-btc").unwrap();
        let rotated = cycle_key(&["usd", "btc", "eth"]);

        assert_eq!(key1, key2);
        assert_ne!(key1, rotated);
    }

    #[test]
    fn test_triangle_has_cycle() {
        let graph = triangle();

        let cycles = enumerate_cycles(&graph, 3);

        assert!(!cycles.is_empty());
        // every discovered rotation traverses exactly the three seed edges
        for key in cycles.keys() {
            assert_eq!(key.len(), 3);
            assert!(is_rotation_of(key, &["eth", "usd", "btc"]));
        }
    }

    #[test]
    fn test_triangle_geometric_cycle_is_unique() {
        let graph = triangle();

        let cycles = enumerate_cycles(&graph, 3);

        let mut canonical: Vec<_> = cycles.keys().map(canonicalize).collect();
        canonical.sort();
        canonical.dedup();
        assert_eq!(canonical.len(), 1);
    }

    #[test]
    fn test_closing_vertex_is_first_currency() {
        let graph = triangle();

        for (key, closing) in enumerate_cycles(&graph, 3) {
            assert_eq!(&key.currencies()[0], &closing);
        }
    }

    #[test]
    fn test_path_graph_has_no_cycles() {
        let graph = graph_of(&[("eth", "usd"), ("usd", "btc")]);

        assert!(enumerate_cycles(&graph, 3).is_empty());
    }

    #[test]
    fn test_square_graph_cycle_lengths() {
        let graph = graph_of(&[
            ("eth", "usd"),
            ("usd", "btc"),
            ("btc", "xrp"),
            ("xrp", "eth"),
        ]);

        assert!(enumerate_cycles(&graph, 3).is_empty());
        assert!(!enumerate_cycles(&graph, 4).is_empty());
    }

    #[test]
    fn test_vertex_reused_across_cycles() {
        // two triangles sharing the eth-usd edge
        let graph = graph_of(&[
            ("eth", "usd"),
            ("usd", "btc"),
            ("btc", "eth"),
            ("usd", "xrp"),
            ("xrp", "eth"),
        ]);

        let cycles = enumerate_cycles(&graph, 3);

        let mut canonical: Vec<_> = cycles.keys().map(canonicalize).collect();
        canonical.sort();
        canonical.dedup();
        assert_eq!(canonical.len(), 2);
    }
}

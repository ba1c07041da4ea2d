//! Undirected graph of currencies, built once from the exchange's tradable
//! pair list. This is the search space for cycle enumeration.

use std::collections::HashMap;

use eyre::{bail, Result};

/// A currency vertex and the ordered list of its neighbors.
///
/// Adjacency is stored as indices into the owning graph's vertex vector, so
/// a vertex never outlives or owns its neighbors.
#[derive(Debug)]
pub struct Vertex {
    /// The currency code, e.g. `eth`
    key: String,
    /// Indices of adjacent vertices, in insertion order
    adjacent: Vec<usize>,
}

impl Vertex {
    /// The currency code of this vertex
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Indices of adjacent vertices, in insertion order
    #[must_use]
    pub fn adjacent(&self) -> &[usize] {
        &self.adjacent
    }
}

/// Undirected graph of currency codes.
///
/// Vertex keys are unique and edges are symmetric and unique per vertex
/// pair. The graph is write-once: there are no removal operations, and after
/// construction it is only read.
#[derive(Debug, Default)]
pub struct Graph {
    /// All vertices, in insertion order
    vertices: Vec<Vertex>,
    /// Lookup from currency code to vertex index
    index: HashMap<String, usize>,
}

impl Graph {
    /// Creates an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an undirected graph from an edge list of currency pairs.
    ///
    /// Vertices are created on first sight; a currency appearing in several
    /// pairs is inserted once.
    ///
    /// # Errors
    /// * If the same pair (in either order) appears twice
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let mut graph = Self::new();

        for (a, b) in pairs {
            if !graph.index.contains_key(a) {
                graph.add_vertex(a)?;
            }

            if !graph.index.contains_key(b) {
                graph.add_vertex(b)?;
            }

            graph.add_edge(a, b)?;
        }

        Ok(graph)
    }

    /// Inserts a vertex with a unique key.
    ///
    /// # Errors
    /// * If a vertex with the same key already exists
    pub fn add_vertex(&mut self, key: &str) -> Result<()> {
        if self.index.contains_key(key) {
            bail!("vertex {key} already exists");
        }

        self.index.insert(key.to_owned(), self.vertices.len());
        self.vertices.push(Vertex {
            key: key.to_owned(),
            adjacent: Vec::new(),
        });

        Ok(())
    }

    /// Links two existing vertices symmetrically.
    ///
    /// # Errors
    /// * If either endpoint does not exist
    /// * If the undirected edge already exists in either direction
    pub fn add_edge(&mut self, key1: &str, key2: &str) -> Result<()> {
        let (Some(&v1), Some(&v2)) = (self.index.get(key1), self.index.get(key2)) else {
            bail!("invalid edge ({key1})<-->({key2})");
        };

        if self.vertices[v1].adjacent.contains(&v2) || self.vertices[v2].adjacent.contains(&v1) {
            bail!("edge already exists ({key1})<-->({key2})");
        }

        self.vertices[v1].adjacent.push(v2);
        self.vertices[v2].adjacent.push(v1);

        Ok(())
    }

    /// All vertices, in insertion order
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The vertex at `index`
    #[must_use]
    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    /// The number of vertices in the graph
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the graph has no vertices
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_add_vertex_duplicate() {
        let mut graph = Graph::new();
        graph.add_vertex("eth").unwrap();

        let err = graph.add_vertex("eth");
        assert_eq!(err.err().unwrap().to_string(), "vertex eth already exists");
    }

    #[test]
    fn test_add_edge_unknown_vertex() {
        let mut graph = Graph::new();
        graph.add_vertex("eth").unwrap();

        let err = graph.add_edge("eth", "usd");
        assert_eq!(
            err.err().unwrap().to_string(),
            "invalid edge (eth)<-->(usd)"
        );
    }

    #[test]
    fn test_add_edge_symmetric_duplicate() {
        let mut graph = Graph::new();
        graph.add_vertex("eth").unwrap();
        graph.add_vertex("usd").unwrap();
        graph.add_edge("eth", "usd").unwrap();

        // the reverse direction is the same undirected edge
        let err = graph.add_edge("usd", "eth");
        assert_eq!(
            err.err().unwrap().to_string(),
            "edge already exists (usd)<-->(eth)"
        );
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let graph = triangle();

        for vertex in graph.vertices() {
            for &neighbor in vertex.adjacent() {
                let back = graph.vertex(neighbor).adjacent();
                assert!(back
                    .iter()
                    .any(|&idx| graph.vertex(idx).key() == vertex.key()));
            }
        }
    }

    #[test]
    fn test_from_pairs_shared_vertices() {
        let graph = triangle();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.vertex(0).key(), "eth");
        assert_eq!(graph.vertex(0).adjacent().len(), 2);
    }

    #[test]
    fn test_from_pairs_duplicate_pair() {
        let pairs = pairs(&[("eth", "usd"), ("usd", "eth")]);

        let err = Graph::from_pairs(&pairs);
        assert_eq!(
            err.err().unwrap().to_string(),
            "edge already exists (usd)<-->(eth)"
        );
    }
}

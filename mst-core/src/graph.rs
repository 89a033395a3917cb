//! Adjacency views and summary statistics over an edge list.

use std::collections::HashMap;
use std::fmt;

use crate::edge::{Edge, VertexId, Weight};

/// An undirected adjacency view: for every input edge `(u, v, w)`, both
/// `u -> (v, w)` and `v -> (u, w)` are present.
#[derive(Debug, Default, Clone)]
pub struct AdjacencyView {
    neighbors: HashMap<VertexId, Vec<(VertexId, Weight)>>,
}

impl AdjacencyView {
    /// Builds an adjacency view from an edge list, inserting both
    /// directions for each edge.
    #[must_use]
    pub fn build(edges: &[Edge]) -> Self {
        let mut neighbors: HashMap<VertexId, Vec<(VertexId, Weight)>> = HashMap::new();
        for edge in edges {
            neighbors.entry(edge.u).or_default().push((edge.v, edge.weight));
            neighbors.entry(edge.v).or_default().push((edge.u, edge.weight));
        }
        Self { neighbors }
    }

    /// Iterates over `(source, targets)` pairs in the adjacency view.
    pub fn sources(&self) -> impl Iterator<Item = (VertexId, &[(VertexId, Weight)])> {
        self.neighbors.iter().map(|(src, targets)| (*src, targets.as_slice()))
    }

    /// Returns `true` if the view has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

/// Summary statistics for a graph: vertex count, edge count, total weight.
///
/// Mirrors the `{v, e, w}` diagnostic the CLI prints for both the input
/// graph and the output MST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    /// Number of distinct vertices referenced by the edge set.
    pub vertices: usize,
    /// Number of edges.
    pub edges: usize,
    /// Sum of edge weights.
    pub total_weight: i64,
}

impl GraphStats {
    /// Computes statistics over an edge list.
    #[must_use]
    pub fn compute(edges: &[Edge]) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut total_weight: i64 = 0;
        for edge in edges {
            seen.insert(edge.u);
            seen.insert(edge.v);
            total_weight += i64::from(edge.weight);
        }
        Self {
            vertices: seen.len(),
            edges: edges.len(),
            total_weight,
        }
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{v: {}, e: {}, w: {}}}",
            self.vertices, self.edges, self.total_weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_view_is_symmetric() {
        let edges = [Edge::new(1, 2, 5)];
        let view = AdjacencyView::build(&edges);
        let mut pairs: Vec<_> = view.sources().flat_map(|(src, targets)| {
            targets.iter().map(move |(dst, w)| (src, *dst, *w)).collect::<Vec<_>>()
        }).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(1, 2, 5), (2, 1, 5)]);
    }

    #[test]
    fn stats_count_distinct_vertices_and_total_weight() {
        let edges = [Edge::new(1, 2, 3), Edge::new(2, 3, 4)];
        let stats = GraphStats::compute(&edges);
        assert_eq!(stats.vertices, 3);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.total_weight, 7);
    }

    #[test]
    fn empty_graph_has_zero_stats() {
        let stats = GraphStats::compute(&[]);
        assert_eq!(stats, GraphStats { vertices: 0, edges: 0, total_weight: 0 });
    }
}

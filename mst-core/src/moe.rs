//! Minimum outgoing edge (MoE) search — Borůvka's rule.

use std::collections::HashMap;

use crate::edge::{Edge, FragmentId, VertexId};
use crate::graph::AdjacencyView;

/// Computes the minimum outgoing edge for every fragment represented in
/// `adjacency`, under the current fragment assignment `fragments`.
///
/// `MoE(f) = argmin_{(u,v,w), F[u]=f, F[v]!=f} (w, u, v)`, lexicographically.
/// The computation first picks each vertex's own best cross-fragment
/// outgoing edge, then keeps the minimum across all vertices belonging to
/// the same source fragment. The result contains at most one edge per
/// distinct source fragment appearing in `adjacency`.
#[must_use]
pub fn compute_moes(
    adjacency: &AdjacencyView,
    fragments: &HashMap<VertexId, FragmentId>,
) -> Vec<Edge> {
    let mut best_per_fragment: HashMap<FragmentId, Edge> = HashMap::new();

    for (src, targets) in adjacency.sources() {
        let Some(&src_fragment) = fragments.get(&src) else {
            continue;
        };

        let mut best: Option<Edge> = None;
        for &(dst, weight) in targets {
            let Some(&dst_fragment) = fragments.get(&dst) else {
                continue;
            };
            if dst_fragment == src_fragment {
                continue;
            }
            let candidate = Edge::new(src, dst, weight);
            best = Some(match best {
                Some(current) if current <= candidate => current,
                _ => candidate,
            });
        }

        let Some(candidate) = best else {
            continue;
        };

        best_per_fragment
            .entry(src_fragment)
            .and_modify(|current| {
                if candidate < *current {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    best_per_fragment.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(pairs: &[(VertexId, FragmentId)]) -> HashMap<VertexId, FragmentId> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn picks_lightest_cross_fragment_edge_per_fragment() {
        let edges = [Edge::new(1, 2, 5), Edge::new(1, 3, 2), Edge::new(2, 3, 1)];
        let adjacency = AdjacencyView::build(&edges);
        let f = fragments(&[(1, 1), (2, 2), (3, 3)]);

        let mut moes = compute_moes(&adjacency, &f);
        moes.sort();

        // fragment 1: best is (1,3,2); fragment 2: best is (2,3,1);
        // fragment 3: best is (3,2,1) [== (2,3,1) reversed direction]
        assert_eq!(moes.len(), 3);
        assert!(moes.contains(&Edge::new(1, 3, 2)));
        assert!(moes.contains(&Edge::new(2, 3, 1)));
    }

    #[test]
    fn ignores_same_fragment_neighbours() {
        let edges = [Edge::new(1, 2, 1), Edge::new(2, 3, 9)];
        let adjacency = AdjacencyView::build(&edges);
        let f = fragments(&[(1, 10), (2, 10), (3, 20)]);

        let moes = compute_moes(&adjacency, &f);
        // fragment 10 can only escape via (2,3,9); fragment 20 only via (3,2,9)
        assert_eq!(moes.len(), 2);
        assert!(moes.iter().any(|e| e.u == 2 && e.v == 3 && e.weight == 9));
    }

    #[test]
    fn single_fragment_has_no_moe() {
        let edges = [Edge::new(1, 2, 1)];
        let adjacency = AdjacencyView::build(&edges);
        let f = fragments(&[(1, 0), (2, 0)]);

        assert!(compute_moes(&adjacency, &f).is_empty());
    }
}

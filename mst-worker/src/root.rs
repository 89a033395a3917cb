//! Root update synthesis: deciding, from one phase's candidate MoEs,
//! which fragment merges actually happen.
//!
//! A candidate `(u, v, w)` is admitted only when `u`'s fragment is Blue
//! and `v`'s fragment is Red this round. Two fragments whose mutual MoE
//! points at each other can therefore never both be admitted — at most
//! one direction survives — which is exactly what keeps a merge round
//! acyclic without needing a general cycle check.

use std::collections::{HashMap, HashSet};

use mst_core::{colour, Colour, Edge, FragmentId, VertexId};

/// What a phase's root-side decision produced: the edges admitted into
/// the MST, and the fragment-merge map to broadcast to every worker.
#[derive(Debug, Clone, Default)]
pub struct PhaseOutcome {
    pub admitted_edges: Vec<Edge>,
    pub update: HashMap<FragmentId, FragmentId>,
}

/// Synthesizes a phase's outcome from its candidate MoEs.
///
/// Colour-filtered candidates are walked in `(w, u, v)` order; a candidate
/// is admitted only if neither its source nor its target fragment has
/// already appeared as an endpoint of an admitted merge this phase. This
/// keeps `U` acyclic and means at most one merge per fragment survives a
/// phase even when several Blue fragments pick the same Red one as their
/// MoE — the rest are deferred to a later round.
#[must_use]
pub fn synthesize(
    round: u64,
    candidates: &[Edge],
    fragments: &HashMap<VertexId, FragmentId>,
) -> PhaseOutcome {
    let mut colour_filtered: Vec<Edge> = candidates
        .iter()
        .copied()
        .filter(|edge| {
            let (Some(&src_fragment), Some(&dst_fragment)) =
                (fragments.get(&edge.u), fragments.get(&edge.v))
            else {
                return false;
            };
            src_fragment != dst_fragment
                && colour(round, src_fragment) == Colour::Blue
                && colour(round, dst_fragment) == Colour::Red
        })
        .collect();
    colour_filtered.sort();

    let mut used_fragments: HashSet<FragmentId> = HashSet::new();
    let mut admitted = Vec::new();
    let mut update = HashMap::new();

    for edge in colour_filtered {
        let src_fragment = fragments[&edge.u];
        let dst_fragment = fragments[&edge.v];
        if used_fragments.contains(&src_fragment) || used_fragments.contains(&dst_fragment) {
            continue;
        }
        used_fragments.insert(src_fragment);
        used_fragments.insert(dst_fragment);
        update.insert(src_fragment, dst_fragment);
        admitted.push(edge);
    }

    PhaseOutcome { admitted_edges: admitted, update }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(pairs: &[(VertexId, FragmentId)]) -> HashMap<VertexId, FragmentId> {
        pairs.iter().copied().collect()
    }

    fn blue_red_round(a: FragmentId, b: FragmentId) -> Option<u64> {
        (0..64).find(|&r| colour(r, a) == Colour::Blue && colour(r, b) == Colour::Red)
    }

    #[test]
    fn admits_a_blue_to_red_candidate() {
        let f = fragments(&[(1, 10), (2, 20)]);
        let round = blue_red_round(10, 20).expect("some round colours 10 blue and 20 red");
        let outcome = synthesize(round, &[Edge::new(1, 2, 5)], &f);
        assert_eq!(outcome.admitted_edges, vec![Edge::new(1, 2, 5)]);
        assert_eq!(outcome.update.get(&10), Some(&20));
    }

    #[test]
    fn rejects_a_red_to_red_or_blue_to_blue_candidate() {
        let f = fragments(&[(1, 10), (2, 20)]);
        let round = (0..64)
            .find(|&r| colour(r, 10) == colour(r, 20))
            .expect("some round colours both fragments the same");
        let outcome = synthesize(round, &[Edge::new(1, 2, 5)], &f);
        assert!(outcome.admitted_edges.is_empty());
        assert!(outcome.update.is_empty());
    }

    #[test]
    fn only_the_lightest_candidate_into_a_shared_target_is_admitted_per_phase() {
        let f = fragments(&[(1, 10), (2, 30), (3, 20)]);
        let round = (0..64)
            .find(|&r| {
                colour(r, 10) == Colour::Blue
                    && colour(r, 20) == Colour::Blue
                    && colour(r, 30) == Colour::Red
            })
            .expect("some round colours both sources blue and the target red");
        let outcome = synthesize(round, &[Edge::new(1, 2, 1), Edge::new(3, 2, 2)], &f);
        // Both 10 and 20 want to merge into 30, but 30 can appear as an
        // admitted merge's endpoint at most once per phase: the lighter
        // candidate (1,2,1) wins and (3,2,2) is deferred to a later round.
        assert_eq!(outcome.admitted_edges, vec![Edge::new(1, 2, 1)]);
        assert_eq!(outcome.update, HashMap::from([(10, 30)]));
    }
}

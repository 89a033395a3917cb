//! Resolving and applying fragment-merge updates.
//!
//! A phase's update is a partial map from an old fragment id to the
//! fragment it merged into. Applying it to a vertex's fragment assignment
//! means following that map to a fixed point, mirroring the original
//! implementation's leaf-side chain resolution (`fetchLeafValue`): a
//! fragment can, in principle, be renamed more than once before a leaf
//! observes the result.

use std::collections::{HashMap, HashSet};

use crate::edge::{FragmentId, VertexId};

/// Follows `update` from `fragment` until it reaches a fragment with no
/// further mapping (or a cycle, which should not occur but is guarded
/// against defensively).
#[must_use]
pub fn resolve(update: &HashMap<FragmentId, FragmentId>, fragment: FragmentId) -> FragmentId {
    let mut current = fragment;
    let mut seen = HashSet::new();
    while let Some(&next) = update.get(&current) {
        if next == current || !seen.insert(current) {
            break;
        }
        current = next;
    }
    current
}

/// Applies `update` to every fragment assignment in `fragments`, in place.
pub fn apply(fragments: &mut HashMap<VertexId, FragmentId>, update: &HashMap<FragmentId, FragmentId>) {
    if update.is_empty() {
        return;
    }
    for fragment in fragments.values_mut() {
        *fragment = resolve(update, *fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_follows_a_chain_to_its_end() {
        let update = HashMap::from([(1, 2), (2, 5)]);
        assert_eq!(resolve(&update, 1), 5);
        assert_eq!(resolve(&update, 2), 5);
        assert_eq!(resolve(&update, 9), 9);
    }

    #[test]
    fn resolve_stops_on_a_defensive_cycle_instead_of_looping() {
        let update = HashMap::from([(1, 2), (2, 1)]);
        assert_eq!(resolve(&update, 1), 1);
    }

    #[test]
    fn apply_rewrites_every_vertex_fragment() {
        let mut fragments = HashMap::from([(10, 1), (11, 1), (12, 3)]);
        let update = HashMap::from([(1, 3)]);
        apply(&mut fragments, &update);
        assert_eq!(fragments[&10], 3);
        assert_eq!(fragments[&11], 3);
        assert_eq!(fragments[&12], 3);
    }
}

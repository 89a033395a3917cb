//! The single message pair workers exchange: a child reports up, its
//! parent answers with the fragment update computed from that phase.

use std::collections::HashMap;

use mst_core::{Edge, FragmentId, VertexId};
use serde::{Deserialize, Serialize};

/// Identifies a worker within the tree. Stable for the lifetime of a run.
pub type WorkerId = u32;

/// Sent by a child to its parent once every one of the child's own children
/// (if any) have reported in for the current phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagateUpRequest {
    /// The sender's worker id, so the parent can retire it on termination.
    pub src_id: WorkerId,
    /// This subtree's candidate minimum-outgoing-edges for the phase.
    pub edges: Vec<Edge>,
    /// Fragment ids for every vertex `edges` touches as a source.
    pub fragment_ids: HashMap<VertexId, FragmentId>,
    /// `true` when `edges` is empty and this subtree has no further work.
    pub terminate: bool,
}

/// The parent's reply: the fragment-merge update to apply this phase.
/// An empty map is a valid reply (no fragments merged this round).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PropagateUpResponse {
    pub updates: HashMap<FragmentId, FragmentId>,
}

impl PropagateUpRequest {
    /// `true` if this request carries no work and no fragment data at all.
    #[must_use]
    pub fn is_empty_terminate(&self) -> bool {
        self.terminate && self.edges.is_empty() && self.fragment_ids.is_empty()
    }
}

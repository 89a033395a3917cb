//! The phase loop every worker runs, regardless of its position in the
//! tree: gather this phase's edges and fragments, compute the minimum
//! outgoing edges, hand them to a parent (or synthesize the round's
//! update locally if there is no parent), apply the result, repeat until
//! no candidates remain.

use std::collections::HashMap;

use mst_core::{AdjacencyView, Edge, FragmentId, VertexId};
use tracing::{debug, info};

use crate::error::WorkerError;
use crate::proto::PropagateUpRequest;
use crate::root;
use crate::transport;
use crate::worker::{RoleState, Worker};

/// Runs `worker` to completion: phases continue until this worker's own
/// candidate set is empty, at which point (if it is an aggregator) its
/// listener is told to stop.
pub async fn run(worker: std::sync::Arc<Worker>) -> Result<(), WorkerError> {
    let mut round: u64 = 0;

    loop {
        let (edges, fragments) = gather_phase(&worker).await;
        let adjacency = AdjacencyView::build(&edges);
        let candidates = mst_core::compute_moes(&adjacency, &fragments);
        let candidates_empty = candidates.is_empty();
        let fragment_ids = fragment_submap(&candidates, &fragments);

        debug!(worker = worker.id, round, candidates = candidates.len(), "phase gathered");

        let update = match worker.parent {
            Some(parent_addr) => {
                let request = PropagateUpRequest {
                    src_id: worker.id,
                    edges: candidates,
                    fragment_ids,
                    terminate: candidates_empty,
                };
                let response =
                    transport::call_propagate_up(parent_addr, &request, worker.rpc_timeout).await?;
                response.updates
            }
            None => {
                let outcome = root::synthesize(round, &candidates, &fragments);
                if !outcome.admitted_edges.is_empty() {
                    info!(worker = worker.id, round, admitted = outcome.admitted_edges.len(), "round admitted edges");
                    mst_core::append_edges(&worker.output_path, &outcome.admitted_edges)?;
                }
                outcome.update
            }
        };

        rearm_barrier(&worker).await;
        publish_update(&worker, &update);
        apply_leaf_update(&worker, &update).await;

        round += 1;
        if candidates_empty {
            break;
        }
    }

    if let Some(state) = worker.as_aggregator() {
        let _ = state.stop_tx.send(true);
    }

    info!(worker = worker.id, rounds = round, "worker finished");
    Ok(())
}

/// Gathers this phase's edges and fragment assignments: for a leaf,
/// that is its (immutable) chunk and its current persistent fragment
/// map; for an aggregator, it is whatever its children reported this
/// phase, taken out of the shared buffers once the barrier clears.
///
/// The barrier itself is armed for the *next* phase only after this
/// phase's update has been computed, in [`rearm_barrier`] — not here.
/// Resetting it here, at the start of the following call, would leave a
/// window between this phase's broadcast (which unblocks children to
/// start their next report) and the reset, in which a fast child's
/// next-phase report could decrement a barrier that has not been
/// re-armed yet and is silently overwritten once it is.
async fn gather_phase(worker: &Worker) -> (Vec<Edge>, HashMap<VertexId, FragmentId>) {
    match &worker.role {
        RoleState::Leaf { edges, fragments } => (edges.clone(), fragments.lock().await.clone()),
        RoleState::Aggregator(state) => {
            loop {
                if *state.barrier_remaining.lock().await == 0 {
                    break;
                }
                state.barrier_notify.notified().await;
            }

            let edges = std::mem::take(&mut *state.edges.lock().await);
            let fragments = std::mem::take(&mut *state.fragments.lock().await);
            (edges, fragments)
        }
    }
}

/// Re-arms the barrier for the next phase: re-reads the current child
/// count (a child may have just been retired by this phase's
/// termination report) and resets `barrier_remaining` to it. Must run
/// before [`publish_update`] broadcasts this phase's result, so that no
/// child can race ahead into the next phase against a barrier that
/// still reflects this one.
async fn rearm_barrier(worker: &Worker) {
    let Some(state) = worker.as_aggregator() else {
        return;
    };
    let child_count = state.children.lock().await.len();
    *state.barrier_remaining.lock().await = child_count;
}

/// Publishes this phase's update for any parked connection handlers
/// (only meaningful for aggregators; a no-op otherwise).
fn publish_update(worker: &Worker, update: &HashMap<FragmentId, FragmentId>) {
    let Some(state) = worker.as_aggregator() else {
        return;
    };
    let next_phase = state.phase_tx.borrow().phase + 1;
    let _ = state
        .phase_tx
        .send(crate::worker::PhaseUpdate { phase: next_phase, updates: update.clone() });
}

/// Applies the phase update to a leaf's persistent fragment map (a
/// no-op for aggregators, whose fragment map is rebuilt from children
/// every phase and never carries state forward itself).
async fn apply_leaf_update(worker: &Worker, update: &HashMap<FragmentId, FragmentId>) {
    if let RoleState::Leaf { fragments, .. } = &worker.role {
        let mut fragments = fragments.lock().await;
        mst_core::apply_update(&mut fragments, update);
    }
}

/// The subset of `fragments` relevant to `edges`: every vertex that
/// appears as a source in a candidate edge, so the parent can resolve
/// colours without needing the whole (potentially much larger) map.
fn fragment_submap(
    edges: &[Edge],
    fragments: &HashMap<VertexId, FragmentId>,
) -> HashMap<VertexId, FragmentId> {
    let mut submap = HashMap::new();
    for edge in edges {
        if let Some(&fragment) = fragments.get(&edge.u) {
            submap.insert(edge.u, fragment);
        }
        if let Some(&fragment) = fragments.get(&edge.v) {
            submap.insert(edge.v, fragment);
        }
    }
    submap
}

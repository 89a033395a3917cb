//! Per-worker state: the leaf's immutable edge chunk and persistent
//! fragment map, or an interior/root node's per-phase aggregation buffers
//! and child barrier.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use mst_core::{Edge, FragmentId, VertexId};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Mutex, Notify};

use crate::error::WorkerError;
use crate::proto::{PropagateUpRequest, PropagateUpResponse, WorkerId};
use crate::transport;

/// One phase's published fragment update, tagged with the phase number
/// so a parked connection handler can tell whether the update it is
/// looking at is the one it is waiting for.
#[derive(Clone, Default)]
pub(crate) struct PhaseUpdate {
    pub phase: u64,
    pub updates: HashMap<FragmentId, FragmentId>,
}

/// State shared by an interior or root node's RPC handlers and its
/// driver loop. Edges and fragments are cleared every phase; they hold
/// only what this phase's children have reported so far.
pub(crate) struct AggregatorState {
    pub edges: Mutex<Vec<Edge>>,
    pub fragments: Mutex<HashMap<VertexId, FragmentId>>,
    pub children: Mutex<Vec<WorkerId>>,
    pub barrier_remaining: Mutex<usize>,
    pub barrier_notify: Notify,
    pub phase_tx: watch::Sender<PhaseUpdate>,
    pub stop_tx: watch::Sender<bool>,
}

impl AggregatorState {
    fn new(children: Vec<WorkerId>) -> Self {
        let (phase_tx, _) = watch::channel(PhaseUpdate::default());
        let (stop_tx, _) = watch::channel(false);
        // Phase 0's barrier is armed here, at construction; every later
        // phase's barrier is armed by the driver's `rearm_barrier`, before
        // that phase's update is broadcast.
        let initial_barrier = children.len();
        Self {
            edges: Mutex::new(Vec::new()),
            fragments: Mutex::new(HashMap::new()),
            children: Mutex::new(children),
            barrier_remaining: Mutex::new(initial_barrier),
            barrier_notify: Notify::new(),
            phase_tx,
            stop_tx,
        }
    }
}

/// A node's role-specific state. A node with no children is a data-leaf
/// (its edge chunk is immutable and its fragment map persists across
/// phases); a node with children aggregates its phase from them instead.
pub(crate) enum RoleState {
    Leaf {
        edges: Vec<Edge>,
        fragments: Mutex<HashMap<VertexId, FragmentId>>,
    },
    Aggregator(AggregatorState),
}

/// A single worker in the tree: its identity, its parent (if any, the
/// address to send `PropagateUp` requests to), and its role state. A
/// worker with no parent is the root and synthesizes phase updates
/// locally instead of asking anywhere.
pub struct Worker {
    pub id: WorkerId,
    pub parent: Option<SocketAddr>,
    pub rpc_timeout: Duration,
    /// Only read from when `parent` is `None`: where admitted MST edges
    /// are appended as the root decides them.
    pub output_path: PathBuf,
    pub(crate) role: RoleState,
}

impl Worker {
    /// Builds a leaf worker owning `edges`. `fragments` starts as the
    /// identity assignment: every vertex in its own singleton fragment.
    #[must_use]
    pub fn leaf(
        id: WorkerId,
        parent: Option<SocketAddr>,
        edges: Vec<Edge>,
        rpc_timeout: Duration,
        output_path: PathBuf,
    ) -> Self {
        let mut fragments = HashMap::new();
        for edge in &edges {
            fragments.entry(edge.u).or_insert(edge.u);
            fragments.entry(edge.v).or_insert(edge.v);
        }
        Self {
            id,
            parent,
            rpc_timeout,
            output_path,
            role: RoleState::Leaf { edges, fragments: Mutex::new(fragments) },
        }
    }

    /// Builds an interior (or root) worker that aggregates from `children`.
    #[must_use]
    pub fn aggregator(
        id: WorkerId,
        parent: Option<SocketAddr>,
        children: Vec<WorkerId>,
        rpc_timeout: Duration,
        output_path: PathBuf,
    ) -> Self {
        Self {
            id,
            parent,
            rpc_timeout,
            output_path,
            role: RoleState::Aggregator(AggregatorState::new(children)),
        }
    }

    pub(crate) fn as_aggregator(&self) -> Option<&AggregatorState> {
        match &self.role {
            RoleState::Aggregator(state) => Some(state),
            RoleState::Leaf { .. } => None,
        }
    }

    /// Runs the accept loop for an interior/root worker's listener.
    /// Returns once the worker's driver has signalled there is nothing
    /// left to serve.
    pub async fn serve(self: &std::sync::Arc<Self>, listener: TcpListener) -> Result<(), WorkerError> {
        let Some(state) = self.as_aggregator() else {
            return Ok(());
        };
        let mut stop_rx = state.stop_tx.subscribe();

        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        return Ok(());
                    }
                }
                accepted = listener.accept() => {
                    let local = listener.local_addr().unwrap_or_else(|_| peer_fallback());
                    let (stream, peer) = accepted.map_err(|source| WorkerError::Transport { addr: local, source })?;
                    let worker = std::sync::Arc::clone(self);
                    tokio::spawn(async move {
                        if let Err(err) = handle_connection(&worker, stream, peer).await {
                            tracing::warn!(%peer, error = %err, "propagate-up connection failed");
                        }
                    });
                }
            }
        }
    }
}

fn peer_fallback() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

async fn handle_connection(worker: &Worker, stream: TcpStream, peer: SocketAddr) -> Result<(), WorkerError> {
    let state = worker
        .as_aggregator()
        .expect("only aggregator workers bind a listener and accept connections");

    let mut framed = transport::frame(stream);
    let request = transport::read_request(&mut framed, peer).await?;
    let phase_before = state.phase_tx.borrow().phase;

    merge_report(state, &request).await;

    let updates = await_phase_update(state, phase_before).await?;
    transport::write_response(&mut framed, peer, &PropagateUpResponse { updates }).await
}

async fn merge_report(state: &AggregatorState, request: &PropagateUpRequest) {
    {
        let mut edges = state.edges.lock().await;
        edges.extend(request.edges.iter().copied());
    }
    {
        let mut fragments = state.fragments.lock().await;
        for (&vertex, &fragment) in &request.fragment_ids {
            fragments.insert(vertex, fragment);
        }
    }
    if request.is_empty_terminate() {
        state.children.lock().await.retain(|&child| child != request.src_id);
    }

    let mut remaining = state.barrier_remaining.lock().await;
    *remaining = remaining.saturating_sub(1);
    if *remaining == 0 {
        state.barrier_notify.notify_one();
    }
}

async fn await_phase_update(
    state: &AggregatorState,
    phase_before: u64,
) -> Result<HashMap<FragmentId, FragmentId>, WorkerError> {
    let mut rx = state.phase_tx.subscribe();
    loop {
        {
            let current = rx.borrow();
            if current.phase > phase_before {
                return Ok(current.updates.clone());
            }
        }
        rx.changed()
            .await
            .map_err(|_| WorkerError::Protocol("phase channel closed before an update arrived".into()))?;
    }
}

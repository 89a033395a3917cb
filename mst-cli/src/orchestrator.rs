//! Wires a parsed graph into a worker tree, runs it to completion, and
//! reports the `{v, e, w}` diagnostic for both the input graph and the
//! resulting MST.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mst_core::GraphStats;
use mst_worker::{Tree, Worker, WorkerId};
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::info;

use crate::error::CliError;

/// Listener bind attempts before giving up (see `mst_worker::bind_retrying`).
const BIND_ATTEMPTS: u32 = 256;

/// Base per-call RPC deadline; scaled up for larger graphs below.
const BASE_RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Additional RPC deadline granted per input edge, so large graphs (more
/// phases, bigger aggregation payloads) do not spuriously time out.
const RPC_TIMEOUT_PER_EDGE: Duration = Duration::from_micros(500);

/// Upper bound on the scaled RPC deadline.
const MAX_RPC_TIMEOUT: Duration = Duration::from_secs(300);

/// Reads `infile`, builds the worker tree, runs it to completion, and
/// appends the resulting MST to `outfile`.
///
/// # Errors
///
/// Returns [`CliError`] if the input graph cannot be read or parsed, or if
/// any worker in the tree fails.
pub async fn run(infile: &Path, outfile: &Path, alpha: f64) -> Result<(), CliError> {
    let edges = mst_core::read_edges(infile)?;
    let input_stats = GraphStats::compute(&edges);
    info!(%input_stats, "read input graph");

    let rpc_timeout = scaled_rpc_timeout(edges.len());

    if let Some(tree) = mst_worker::build_tree(&edges, alpha) {
        run_tree(tree, outfile, rpc_timeout).await?;
    } else {
        info!("empty input graph, nothing to compute");
    }

    let output_stats = read_output_stats(outfile)?;
    println!("input  {input_stats}");
    println!("output {output_stats}");
    Ok(())
}

/// Binds every interior/root listener, spawns each worker's server and
/// driver tasks, then waits for all of them to finish.
async fn run_tree(tree: Tree, outfile: &Path, rpc_timeout: Duration) -> Result<(), CliError> {
    let mut listeners: HashMap<WorkerId, TcpListener> = HashMap::new();
    let mut addrs: HashMap<WorkerId, SocketAddr> = HashMap::new();

    // Bind root-first, matching the lifecycle invariant that a parent is
    // always listening before any child can try to connect to it.
    for node in tree.root_first() {
        if node.is_leaf() {
            continue;
        }
        let listener = mst_worker::bind_retrying(BIND_ATTEMPTS).await?;
        let addr = listener
            .local_addr()
            .map_err(|source| mst_worker::WorkerError::Transport {
                addr: SocketAddr::from(([127, 0, 0, 1], 0)),
                source,
            })?;
        info!(worker = node.id, %addr, "bound worker listener");
        addrs.insert(node.id, addr);
        listeners.insert(node.id, listener);
    }

    let mut workers = Vec::with_capacity(tree.nodes.len());
    for node in tree.root_first() {
        let parent_addr = node.parent.map(|parent_id| addrs[&parent_id]);
        let worker = if node.is_leaf() {
            Worker::leaf(
                node.id,
                parent_addr,
                node.edges.clone(),
                rpc_timeout,
                outfile.to_path_buf(),
            )
        } else {
            Worker::aggregator(
                node.id,
                parent_addr,
                node.children.clone(),
                rpc_timeout,
                outfile.to_path_buf(),
            )
        };
        workers.push(Arc::new(worker));
    }

    let mut tasks = JoinSet::new();
    for worker in &workers {
        if let Some(listener) = listeners.remove(&worker.id) {
            let worker = Arc::clone(worker);
            tasks.spawn(async move { worker.serve(listener).await });
        }
    }
    for worker in &workers {
        let worker = Arc::clone(worker);
        tasks.spawn(async move { mst_worker::run(worker).await });
    }

    while let Some(outcome) = tasks.join_next().await {
        outcome??;
    }
    Ok(())
}

/// Scales the per-call RPC deadline with graph size: bigger graphs mean
/// more phases and bigger aggregation payloads at interior nodes.
fn scaled_rpc_timeout(edge_count: usize) -> Duration {
    let scaled = BASE_RPC_TIMEOUT + RPC_TIMEOUT_PER_EDGE.saturating_mul(edge_count as u32);
    scaled.min(MAX_RPC_TIMEOUT)
}

/// Reads `{v, e, w}` stats for the output file, treating a not-yet-created
/// file (e.g. an empty-graph run) as an empty graph rather than an error.
fn read_output_stats(outfile: &Path) -> Result<GraphStats, CliError> {
    if !outfile.exists() {
        return Ok(GraphStats::compute(&[]));
    }
    let edges = mst_core::read_edges(outfile)?;
    Ok(GraphStats::compute(&edges))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_timeout_scales_with_edge_count_and_is_capped() {
        assert_eq!(scaled_rpc_timeout(0), BASE_RPC_TIMEOUT);
        assert!(scaled_rpc_timeout(1_000) > BASE_RPC_TIMEOUT);
        assert_eq!(scaled_rpc_timeout(10_000_000), MAX_RPC_TIMEOUT);
    }

    #[test]
    fn output_stats_of_a_missing_file_are_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("does-not-exist.txt");
        let stats = read_output_stats(&path).expect("missing file is not an error");
        assert_eq!(stats, GraphStats::compute(&[]));
    }
}

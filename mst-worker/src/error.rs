//! Error taxonomy for the worker runtime.

use std::net::SocketAddr;
use std::time::Duration;

/// Anything that can go wrong while running a worker tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WorkerError {
    /// A listener could not be bound after exhausting its retry budget.
    #[error("could not bind a TCP listener after {attempts} attempts")]
    BindExhausted { attempts: u32 },

    /// A connect, send, or receive against `addr` failed at the transport
    /// layer.
    #[error("transport error talking to {addr}: {source}")]
    Transport {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// A call to `addr` did not complete within its deadline.
    #[error("RPC to {addr} timed out after {timeout:?}")]
    Timeout { addr: SocketAddr, timeout: Duration },

    /// The peer closed the connection before a full response arrived.
    #[error("connection to {addr} closed before a response was received")]
    ConnectionClosed { addr: SocketAddr },

    /// A frame did not decode to the expected message type.
    #[error("malformed message on the wire: {0}")]
    Codec(#[from] serde_json::Error),

    /// A peer violated the phase protocol (out-of-order child id, duplicate
    /// termination, etc).
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Propagated from `mst-core` (edge-list I/O, parse errors).
    #[error(transparent)]
    Graph(#[from] mst_core::GraphError),
}

//! Top-level CLI error type, mapping every failure mode onto the exit-code
//! policy of the spec's error taxonomy (ConfigError / IoError / ParseError
//! / TransportError / ProtocolError).

use std::process::ExitCode;

use mst_core::GraphError;
use mst_worker::WorkerError;

/// Everything that can cause the `mst` binary to exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Graph file I/O, or a malformed edge line.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A worker's transport, protocol, or propagated graph error.
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// A worker task panicked or was cancelled.
    #[error("a worker task failed to run to completion: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CliError {
    /// Maps this error onto the process exit code policy: `IoError` and
    /// `ParseError` get distinct codes from `TransportError`/`ProtocolError`
    /// so callers (and tests) can distinguish a bad input file from a
    /// worker-tree failure without parsing the message.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Graph(GraphError::Io { .. }) => ExitCode::from(2),
            Self::Graph(GraphError::Parse { .. }) => ExitCode::from(3),
            Self::Graph(_) => ExitCode::from(2),
            Self::Worker(WorkerError::Graph(GraphError::Io { .. })) => ExitCode::from(2),
            Self::Worker(WorkerError::Graph(GraphError::Parse { .. })) => ExitCode::from(3),
            Self::Worker(WorkerError::Graph(_)) => ExitCode::from(2),
            Self::Worker(WorkerError::Protocol(_)) => ExitCode::from(5),
            Self::Worker(_) => ExitCode::from(4),
            Self::Join(_) => ExitCode::from(4),
        }
    }
}

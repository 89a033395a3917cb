//! Error taxonomy for graph parsing, I/O, and MST primitives.

use std::io;

/// Errors raised while reading, writing, or validating a graph.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// The graph file could not be opened, read, or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path of the file the error occurred on.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line did not parse as exactly three whitespace-separated integers.
    #[error("malformed edge line {line_number} in {path}: {line}")]
    Parse {
        /// Path of the file containing the malformed line.
        path: String,
        /// 1-indexed line number of the malformed line.
        line_number: usize,
        /// The offending line, verbatim.
        line: String,
    },
}

impl GraphError {
    pub(crate) fn io(path: &str, source: io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}

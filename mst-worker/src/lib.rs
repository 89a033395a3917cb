//! The worker-tree runtime: the logical tree builder, the wire protocol,
//! the root's merge-admission logic, and the phase-synchronised driver
//! that runs identically whether a worker is a leaf, an interior node,
//! or the root.

mod driver;
mod error;
mod proto;
mod root;
mod transport;
mod tree;
mod worker;

pub use driver::run;
pub use error::WorkerError;
pub use proto::{PropagateUpRequest, PropagateUpResponse, WorkerId};
pub use root::{synthesize as synthesize_round, PhaseOutcome};
pub use transport::bind_retrying;
pub use tree::{build as build_tree, Tree, TreeNode};
pub use worker::Worker;

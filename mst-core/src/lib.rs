//! Graph primitives for the distributed Borůvka MST worker tree.
//!
//! This crate holds everything that does not depend on the network: the
//! `Edge` record and its canonical text I/O, the undirected adjacency view,
//! minimum-outgoing-edge search, and the seeded two-colouring used to break
//! symmetry between fragments that pick each other as their MoE.

mod colour;
mod edge;
mod error;
mod fragment;
mod graph;
mod moe;

pub use colour::{colour, Colour, SEED};
pub use edge::{append_edges, read_edges, sort_canonical, Edge, FragmentId, VertexId, Weight};
pub use error::GraphError;
pub use fragment::{apply as apply_update, resolve as resolve_fragment};
pub use graph::{AdjacencyView, GraphStats};
pub use moe::compute_moes;

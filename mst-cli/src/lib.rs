//! Support library for the `mst` CLI binary: argument parsing, logging
//! setup, and the orchestrator that wires a parsed graph into a running
//! worker tree.

pub mod cli;
pub mod error;
pub mod logging;
pub mod orchestrator;

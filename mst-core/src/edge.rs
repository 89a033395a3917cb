//! The `Edge` record and canonical graph text I/O.
//!
//! On-disk format: UTF-8 text, one edge per line, three whitespace-separated
//! integers `u v w`. The canonical output order sorts ascending by
//! `(weight, u, v)`.

use std::cmp::Ordering;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// A vertex identifier.
pub type VertexId = u32;

/// A fragment identifier; drawn from the same space as [`VertexId`].
pub type FragmentId = u32;

/// An edge weight.
pub type Weight = i32;

/// An undirected edge `(u, v, w)`.
///
/// `u < v` is not required on construction; ordering is established by
/// [`Edge::cmp`] for canonical output, not by the field values themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// One endpoint of the edge.
    pub u: VertexId,
    /// The other endpoint of the edge.
    pub v: VertexId,
    /// The edge weight.
    pub weight: Weight,
}

impl Edge {
    /// Builds a new edge.
    #[must_use]
    pub const fn new(u: VertexId, v: VertexId, weight: Weight) -> Self {
        Self { u, v, weight }
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.u.cmp(&other.u))
            .then_with(|| self.v.cmp(&other.v))
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reads a graph's edges from a plain-text edge-list file.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if the file cannot be opened or read, or
/// [`GraphError::Parse`] if a line does not contain exactly three integers.
pub fn read_edges(path: impl AsRef<Path>) -> Result<Vec<Edge>, GraphError> {
    let path_ref = path.as_ref();
    let path_str = path_ref.display().to_string();
    let file =
        std::fs::File::open(path_ref).map_err(|source| GraphError::io(&path_str, source))?;
    let reader = BufReader::new(file);

    let mut edges = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| GraphError::io(&path_str, source))?;
        let edge = parse_line(&line).ok_or_else(|| GraphError::Parse {
            path: path_str.clone(),
            line_number: index + 1,
            line: line.clone(),
        })?;
        edges.push(edge);
    }

    Ok(edges)
}

fn parse_line(line: &str) -> Option<Edge> {
    let mut parts = line.split_whitespace();
    let u = parts.next()?.parse().ok()?;
    let v = parts.next()?.parse().ok()?;
    let weight = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Edge::new(u, v, weight))
}

/// Sorts edges in canonical ascending order by `(weight, u, v)`.
pub fn sort_canonical(edges: &mut [Edge]) {
    edges.sort_unstable();
}

/// Appends `edges` to `path`, sorted in canonical order.
///
/// The file is created if it does not exist; existing contents are
/// preserved (append mode). Callers that want a fresh output file are
/// responsible for truncating it first.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if the file cannot be opened or written.
pub fn append_edges(path: impl AsRef<Path>, edges: &[Edge]) -> Result<(), GraphError> {
    let path_ref = path.as_ref();
    let path_str = path_ref.display().to_string();

    let mut sorted = edges.to_vec();
    sort_canonical(&mut sorted);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path_ref)
        .map_err(|source| GraphError::io(&path_str, source))?;
    let mut writer = BufWriter::new(file);

    for edge in &sorted {
        writeln!(writer, "{} {} {}", edge.u, edge.v, edge.weight)
            .map_err(|source| GraphError::io(&path_str, source))?;
    }
    writer
        .flush()
        .map_err(|source| GraphError::io(&path_str, source))?;

    Ok(())
}

// Directed edges between graph nodes, buffered until teardown.

use crate::domain::ids::NodeId;
use serde::{Deserialize, Serialize};

/// Visual style of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// Operand/result data flow.
    Plain,
    /// Same variable, later point in time.
    Dotted,
    /// Source of a move, now logically invalid.
    Tapered,
}

impl EdgeStyle {
    /// DOT `style` attribute value, `None` for plain edges.
    pub fn dot_attr(&self) -> Option<&'static str> {
        match self {
            EdgeStyle::Plain => None,
            EdgeStyle::Dotted => Some("dotted"),
            EdgeStyle::Tapered => Some("tapered"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub src: NodeId,
    pub dst: NodeId,
    pub style: EdgeStyle,
}

impl Edge {
    pub fn plain(src: NodeId, dst: NodeId) -> Self {
        Self { src, dst, style: EdgeStyle::Plain }
    }

    pub fn dotted(src: NodeId, dst: NodeId) -> Self {
        Self { src, dst, style: EdgeStyle::Dotted }
    }

    pub fn tapered(src: NodeId, dst: NodeId) -> Self {
        Self { src, dst, style: EdgeStyle::Tapered }
    }
}

/// Append-only edge list, written out once at teardown.
#[derive(Debug, Default)]
pub struct EdgeBuffer {
    edges: Vec<Edge>,
}

impl EdgeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }
}

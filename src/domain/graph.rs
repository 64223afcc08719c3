//! Graph Node Model
//!
//! Describes what a rendered node is (value occurrence or operation marker)
//! and how it looks, independent of any output format.

use crate::domain::edge::{Edge, EdgeStyle};
use crate::domain::ids::NodeId;
use crate::domain::value::Provenance;

/// Shape of an operation marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Constructors
    Diamond,
    /// Operators and assignments
    Circle,
}

impl MarkerShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerShape::Diamond => "diamond",
            MarkerShape::Circle => "circle",
        }
    }
}

/// Fill colors used by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Green,
    Red,
    White,
}

impl Fill {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fill::Green => "green",
            Fill::Red => "red",
            Fill::White => "white",
        }
    }

    /// Background of a value table.
    pub fn for_provenance(provenance: Provenance) -> Fill {
        match provenance {
            Provenance::Temporary => Fill::Red,
            Provenance::Named => Fill::Green,
        }
    }
}

/// Event represented by an operation node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    DefaultCtor,
    ValueCtor,
    CopyCtor,
    MoveCtor,
    CopyAssign,
    MoveAssign,
    /// Arithmetic or logical operator, labeled by its symbol.
    Operator(String),
}

impl OperationKind {
    pub fn label(&self) -> &str {
        match self {
            OperationKind::DefaultCtor => "DefaultCtor",
            OperationKind::ValueCtor => "ValueCtor",
            OperationKind::CopyCtor => "CopyCtor",
            OperationKind::MoveCtor => "MoveCtor",
            OperationKind::CopyAssign => "CopyAssOptor",
            OperationKind::MoveAssign => "MoveAssOptor",
            OperationKind::Operator(symbol) => symbol,
        }
    }

    pub fn shape(&self) -> MarkerShape {
        match self {
            OperationKind::DefaultCtor
            | OperationKind::ValueCtor
            | OperationKind::CopyCtor
            | OperationKind::MoveCtor => MarkerShape::Diamond,
            _ => MarkerShape::Circle,
        }
    }

    /// Green leaves other values intact, red duplicates them.
    pub fn fill(&self) -> Fill {
        match self {
            OperationKind::CopyCtor | OperationKind::CopyAssign => Fill::Red,
            OperationKind::Operator(_) => Fill::White,
            _ => Fill::Green,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Value {
        name: String,
        payload: i64,
        provenance: Provenance,
        address: usize,
    },
    Operation(OperationKind),
}

/// A node as it was rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Function grouping depth at render time.
    pub depth: usize,
}

impl NodeRecord {
    pub fn is_value(&self) -> bool {
        matches!(self.kind, NodeKind::Value { .. })
    }

    /// Label of an operation node, `None` for values.
    pub fn operation_label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Operation(op) => Some(op.label()),
            NodeKind::Value { .. } => None,
        }
    }

    /// Name of a value node, `None` for operations.
    pub fn value_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Value { name, .. } => Some(name),
            NodeKind::Operation(_) => None,
        }
    }
}

/// In-memory copy of everything a graph recorder has produced so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<Edge>,
    /// Function groupings opened over the run.
    pub groupings: usize,
}

impl GraphSnapshot {
    pub fn value_nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.iter().filter(|n| n.is_value())
    }

    pub fn operation_nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.iter().filter(|n| !n.is_value())
    }

    /// Operation nodes carrying `label`.
    pub fn operations_labeled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a NodeRecord> {
        self.operation_nodes()
            .filter(move |n| n.operation_label() == Some(label))
    }

    /// Value nodes for the variable called `name`, in creation order.
    pub fn occurrences_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a NodeRecord> {
        self.value_nodes().filter(move |n| n.value_name() == Some(name))
    }

    pub fn edges_styled(&self, style: EdgeStyle) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.style == style)
    }

    pub fn has_edge(&self, src: NodeId, dst: NodeId, style: EdgeStyle) -> bool {
        self.edges
            .iter()
            .any(|e| e.src == src && e.dst == dst && e.style == style)
    }
}

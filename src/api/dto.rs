use serde::{Serialize, Deserialize};
use crate::domain::edge::EdgeStyle;
use crate::domain::graph::{GraphSnapshot, NodeKind};

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphDto {
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
    pub groupings: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeDto {
    pub id: u64,
    pub kind: String, // "value" or "operation"
    pub label: String,
    pub value: Option<i64>,
    pub temporary: Option<bool>,
    pub depth: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeDto {
    pub from: u64,
    pub to: u64,
    pub style: EdgeStyle,
}

impl From<&GraphSnapshot> for GraphDto {
    fn from(snapshot: &GraphSnapshot) -> Self {
        let nodes = snapshot.nodes.iter().map(|n| match &n.kind {
            NodeKind::Value { name, payload, provenance, .. } => NodeDto {
                id: n.id.0,
                kind: "value".to_string(),
                label: name.clone(),
                value: Some(*payload),
                temporary: Some(provenance.is_temporary()),
                depth: n.depth,
            },
            NodeKind::Operation(op) => NodeDto {
                id: n.id.0,
                kind: "operation".to_string(),
                label: op.label().to_string(),
                value: None,
                temporary: None,
                depth: n.depth,
            },
        }).collect();

        let edges = snapshot.edges.iter().map(|e| EdgeDto {
            from: e.src.0,
            to: e.dst.0,
            style: e.style,
        }).collect();

        GraphDto { nodes, edges, groupings: snapshot.groupings }
    }
}

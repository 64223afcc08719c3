//! DOT Node Renderer
//!
//! Writes Graphviz node definitions, each node id at most once.

use crate::domain::graph::{Fill, NodeKind, NodeRecord, OperationKind};
use crate::domain::ids::NodeId;
use crate::domain::value::TrackedValue;
use std::collections::HashSet;
use std::io::{self, Write};

pub struct NodeRenderer {
    rendered: HashSet<NodeId>,
    records: Vec<NodeRecord>,
    indent: bool,
}

impl NodeRenderer {
    pub fn new(indent: bool) -> Self {
        Self {
            rendered: HashSet::new(),
            records: Vec::new(),
            indent,
        }
    }

    /// Write a value-table node for `value` unless `id` was already rendered.
    /// Returns whether anything was written.
    pub fn render_value<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        id: NodeId,
        value: &dyn TrackedValue,
        depth: usize,
    ) -> io::Result<bool> {
        if !self.rendered.insert(id) {
            return Ok(false);
        }

        let pad = self.pad(depth);
        let color = Fill::for_provenance(value.provenance());
        let address = value.address();
        writeln!(
            out,
            "{pad}{id} [shape = \"none\" label = <<table border = \"1\" bgcolor = \"{}\">",
            color.as_str()
        )?;
        writeln!(out, "{pad}<tr><td>name</td><td>{}</td></tr>", escape_html(value.name()))?;
        writeln!(out, "{pad}<tr><td>value</td><td>{}</td></tr>", value.payload())?;
        writeln!(out, "{pad}<tr><td>address</td><td>{:#x}</td></tr>", address)?;
        writeln!(out, "{pad}</table>>]")?;

        self.records.push(NodeRecord {
            id,
            kind: NodeKind::Value {
                name: value.name().to_string(),
                payload: value.payload(),
                provenance: value.provenance(),
                address,
            },
            depth,
        });
        Ok(true)
    }

    /// Write an operation marker unless `id` was already rendered.
    pub fn render_operation<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        id: NodeId,
        op: &OperationKind,
        depth: usize,
    ) -> io::Result<bool> {
        if !self.rendered.insert(id) {
            return Ok(false);
        }

        writeln!(
            out,
            "{}{} [style = filled label = \"{}\" shape = \"{}\" fillcolor = \"{}\"]",
            self.pad(depth),
            id,
            escape_label(op.label()),
            op.shape().as_str(),
            op.fill().as_str()
        )?;

        self.records.push(NodeRecord {
            id,
            kind: NodeKind::Operation(op.clone()),
            depth,
        });
        Ok(true)
    }

    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.rendered.contains(&id)
    }

    /// Rendered nodes in emission order.
    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn pad(&self, depth: usize) -> String {
        if self.indent {
            "    ".repeat(depth + 1)
        } else {
            String::new()
        }
    }
}

/// Escape text for a double-quoted DOT string.
pub fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escape text for an HTML-like label cell.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

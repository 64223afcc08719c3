//! Graphviz Graph Builder
//!
//! Turns recorder events into DOT text. Nodes are written as soon as they
//! exist; edges are buffered and written in one pass at teardown, so every
//! edge endpoint is already defined when the edge appears.

use crate::domain::edge::{Edge, EdgeBuffer};
use crate::domain::graph::{GraphSnapshot, OperationKind};
use crate::domain::ids::{IdAllocator, NodeId};
use crate::domain::occurrence::OccurrenceTracker;
use crate::domain::value::TrackedValue;
use crate::error::{RecorderError, Result};
use crate::infrastructure::dot_renderer::{escape_label, NodeRenderer};
use crate::ports::{EventRecorder, MoveKind, MoveToken};
use std::io::Write;

/// Graph-level attributes written in the opening block.
#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub name: Option<String>,
    pub rankdir: Option<String>,
    pub indent: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            name: None,
            rankdir: None,
            indent: true,
        }
    }
}

pub struct GraphBuilder<W: Write> {
    out: Option<W>,
    ids: IdAllocator,
    tracker: OccurrenceTracker,
    renderer: NodeRenderer,
    edges: EdgeBuffer,
    depth: usize,
    groupings: usize,
    finished: bool,
}

impl<W: Write> GraphBuilder<W> {
    /// Start a graph on `out`, writing the opening block.
    pub fn new(mut out: W, options: GraphOptions) -> Result<Self> {
        match &options.name {
            Some(name) => writeln!(out, "digraph \"{}\" {{", escape_label(name))?,
            None => writeln!(out, "digraph {{")?,
        }
        let renderer = NodeRenderer::new(options.indent);
        if let Some(rankdir) = &options.rankdir {
            writeln!(out, "{}rankdir = \"{}\"", renderer.pad(0), escape_label(rankdir))?;
        }

        Ok(Self {
            out: Some(out),
            ids: IdAllocator::new(),
            tracker: OccurrenceTracker::new(),
            renderer,
            edges: EdgeBuffer::new(),
            depth: 0,
            groupings: 0,
            finished: false,
        })
    }

    /// Tear down and hand back the output.
    pub fn into_inner(mut self) -> Result<W> {
        self.teardown()?;
        self.out.take().ok_or(RecorderError::Finished)
    }

    /// Number of node ids issued so far.
    pub fn nodes_issued(&self) -> u64 {
        self.ids.issued()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────

    fn ensure_open(&self) -> Result<()> {
        if self.finished {
            return Err(RecorderError::Finished);
        }
        Ok(())
    }

    fn writer(out: &mut Option<W>) -> Result<&mut W> {
        out.as_mut().ok_or(RecorderError::Finished)
    }

    /// New occurrence of `value`: fresh node, continuity edge if seen before.
    fn new_occurrence(&mut self, value: &dyn TrackedValue) -> Result<NodeId> {
        let resolved = self.tracker.resolve(value.identity(), &mut self.ids);
        if let Some(edge) = resolved.continuity {
            self.edges.push(edge);
        }
        let out = Self::writer(&mut self.out)?;
        self.renderer.render_value(out, resolved.node, value, self.depth)?;
        Ok(resolved.node)
    }

    /// Current node of `value`. Values never seen before get their first
    /// occurrence here.
    fn current_occurrence(&mut self, value: &dyn TrackedValue) -> Result<NodeId> {
        match self.tracker.peek_current(value.identity()) {
            Some(node) => Ok(node),
            None => self.new_occurrence(value),
        }
    }

    fn operation_node(&mut self, op: OperationKind) -> Result<NodeId> {
        let node = self.ids.fetch_add();
        let out = Self::writer(&mut self.out)?;
        self.renderer.render_operation(out, node, &op, self.depth)?;
        tracing::debug!(node = %node, op = op.label(), "operation node");
        Ok(node)
    }

    fn construct(&mut self, value: &dyn TrackedValue, op: OperationKind) -> Result<()> {
        self.ensure_open()?;
        let value_node = self.new_occurrence(value)?;
        let op_node = self.operation_node(op)?;
        self.edges.push(Edge::plain(op_node, value_node));
        Ok(())
    }

    fn move_begin(&mut self, src: &dyn TrackedValue, kind: MoveKind) -> Result<MoveToken> {
        self.ensure_open()?;
        let src_node = self.current_occurrence(src)?;
        let op = match kind {
            MoveKind::Construct => OperationKind::MoveCtor,
            MoveKind::Assign => OperationKind::MoveAssign,
        };
        let op_node = self.operation_node(op)?;
        self.edges.push(Edge::plain(src_node, op_node));
        Ok(MoveToken::new(op_node, kind))
    }

    fn move_end(
        &mut self,
        dst: &dyn TrackedValue,
        src: &dyn TrackedValue,
        token: MoveToken,
        expected: MoveKind,
    ) -> Result<()> {
        self.ensure_open()?;
        if token.kind() != expected {
            tracing::warn!(
                expected = ?expected,
                got = ?token.kind(),
                "move end called with a token from a different move kind"
            );
        }
        let op_node = token.operation();
        let src_node = self.new_occurrence(src)?;
        let dst_node = self.new_occurrence(dst)?;
        self.edges.push(Edge::plain(op_node, dst_node));
        self.edges.push(Edge::tapered(op_node, src_node));
        Ok(())
    }

    fn write_edges(&mut self) -> Result<()> {
        let pad = self.renderer.pad(0);
        let out = Self::writer(&mut self.out)?;
        for edge in self.edges.iter() {
            match edge.style.dot_attr() {
                Some(style) => writeln!(
                    out,
                    "{pad}{} -> {} [style = \"{}\"]",
                    edge.src, edge.dst, style
                )?,
                None => writeln!(out, "{pad}{} -> {}", edge.src, edge.dst)?,
            }
        }
        Ok(())
    }
}

impl<W: Write> EventRecorder for GraphBuilder<W> {
    fn record_default_construct(&mut self, value: &dyn TrackedValue) -> Result<()> {
        self.construct(value, OperationKind::DefaultCtor)
    }

    fn record_value_construct(&mut self, value: &dyn TrackedValue) -> Result<()> {
        self.construct(value, OperationKind::ValueCtor)
    }

    fn record_copy_construct(&mut self, dst: &dyn TrackedValue, src: &dyn TrackedValue) -> Result<()> {
        self.ensure_open()?;
        let src_node = self.current_occurrence(src)?;
        let dst_node = self.new_occurrence(dst)?;
        let op_node = self.operation_node(OperationKind::CopyCtor)?;
        self.edges.push(Edge::plain(src_node, op_node));
        self.edges.push(Edge::plain(op_node, dst_node));
        Ok(())
    }

    fn record_move_construct_begin(&mut self, src: &dyn TrackedValue) -> Result<MoveToken> {
        self.move_begin(src, MoveKind::Construct)
    }

    fn record_move_construct_end(
        &mut self,
        dst: &dyn TrackedValue,
        src: &dyn TrackedValue,
        token: MoveToken,
    ) -> Result<()> {
        self.move_end(dst, src, token, MoveKind::Construct)
    }

    fn record_destruct(&mut self, value: &dyn TrackedValue) -> Result<()> {
        self.ensure_open()?;
        let node = self.new_occurrence(value)?;
        tracing::debug!(node = %node, name = value.name(), "destruct");
        Ok(())
    }

    fn record_copy_assign(&mut self, dst: &dyn TrackedValue, src: &dyn TrackedValue) -> Result<()> {
        self.ensure_open()?;
        let src_node = self.current_occurrence(src)?;
        let dst_node = self.new_occurrence(dst)?;
        let op_node = self.operation_node(OperationKind::CopyAssign)?;
        self.edges.push(Edge::plain(src_node, op_node));
        self.edges.push(Edge::plain(op_node, dst_node));
        Ok(())
    }

    fn record_move_assign_begin(&mut self, src: &dyn TrackedValue) -> Result<MoveToken> {
        self.move_begin(src, MoveKind::Assign)
    }

    fn record_move_assign_end(
        &mut self,
        dst: &dyn TrackedValue,
        src: &dyn TrackedValue,
        token: MoveToken,
    ) -> Result<()> {
        self.move_end(dst, src, token, MoveKind::Assign)
    }

    fn record_unary_op(
        &mut self,
        result: &dyn TrackedValue,
        operand: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()> {
        self.ensure_open()?;
        let operand_node = self.current_occurrence(operand)?;
        let result_node = self.new_occurrence(result)?;
        let op_node = self.operation_node(OperationKind::Operator(symbol.to_string()))?;
        self.edges.push(Edge::plain(operand_node, op_node));
        self.edges.push(Edge::plain(op_node, result_node));
        Ok(())
    }

    fn record_binary_op(
        &mut self,
        result: &dyn TrackedValue,
        lhs: &dyn TrackedValue,
        rhs: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()> {
        self.ensure_open()?;
        let lhs_node = self.current_occurrence(lhs)?;
        let rhs_node = self.current_occurrence(rhs)?;
        let result_node = self.new_occurrence(result)?;
        let op_node = self.operation_node(OperationKind::Operator(symbol.to_string()))?;
        self.edges.push(Edge::plain(lhs_node, op_node));
        self.edges.push(Edge::plain(rhs_node, op_node));
        self.edges.push(Edge::plain(op_node, result_node));
        Ok(())
    }

    fn record_binary_assign_op(
        &mut self,
        result: &dyn TrackedValue,
        other: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()> {
        self.ensure_open()?;
        let other_node = self.current_occurrence(other)?;
        let result_node = self.new_occurrence(result)?;
        let op_node = self.operation_node(OperationKind::Operator(symbol.to_string()))?;
        self.edges.push(Edge::plain(other_node, op_node));
        self.edges.push(Edge::plain(op_node, result_node));
        Ok(())
    }

    fn record_function_entry(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        let pad = self.renderer.pad(self.depth);
        let out = Self::writer(&mut self.out)?;
        writeln!(out, "{pad}subgraph cluster_{} {{", self.groupings)?;
        writeln!(out, "{pad}    label = \"{}\"", escape_label(name))?;
        self.groupings += 1;
        self.depth += 1;
        tracing::debug!(function = name, depth = self.depth, "enter");
        Ok(())
    }

    fn record_function_exit(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.depth == 0 {
            tracing::warn!("function exit without a matching entry, ignored");
            return Ok(());
        }
        self.depth -= 1;
        let pad = self.renderer.pad(self.depth);
        let out = Self::writer(&mut self.out)?;
        writeln!(out, "{pad}}}")?;
        tracing::debug!(depth = self.depth, "exit");
        Ok(())
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn teardown(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        if self.depth > 0 {
            tracing::warn!(open = self.depth, "closing function groupings left open");
            while self.depth > 0 {
                self.depth -= 1;
                let pad = self.renderer.pad(self.depth);
                writeln!(Self::writer(&mut self.out)?, "{pad}}}")?;
            }
        }

        self.write_edges()?;
        let out = Self::writer(&mut self.out)?;
        writeln!(out, "}}")?;
        out.flush()?;

        tracing::info!(
            nodes = self.ids.issued(),
            edges = self.edges.len(),
            groupings = self.groupings,
            "graph written"
        );
        Ok(())
    }

    fn snapshot(&self) -> Option<GraphSnapshot> {
        Some(GraphSnapshot {
            nodes: self.renderer.records().to_vec(),
            edges: self.edges.iter().copied().collect(),
            groupings: self.groupings,
        })
    }
}

impl<W: Write> Drop for GraphBuilder<W> {
    fn drop(&mut self) {
        if self.out.is_some() && !self.finished {
            if let Err(e) = self.teardown() {
                tracing::warn!("Failed to finish graph on drop: {}", e);
            }
        }
    }
}

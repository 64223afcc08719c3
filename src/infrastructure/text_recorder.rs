//! Plain-text event log, one line per event, indented by function depth.

use crate::domain::graph::OperationKind;
use crate::domain::ids::{IdAllocator, NodeId};
use crate::domain::value::TrackedValue;
use crate::error::{RecorderError, Result};
use crate::ports::{EventRecorder, MoveKind, MoveToken};
use std::io::Write;

pub struct TextRecorder<W: Write> {
    out: W,
    events: IdAllocator,
    depth: usize,
    finished: bool,
}

impl<W: Write> TextRecorder<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            events: IdAllocator::new(),
            depth: 0,
            finished: false,
        }
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.teardown()?;
        Ok(self.out)
    }

    fn line(&mut self, text: &str) -> Result<()> {
        if self.finished {
            return Err(RecorderError::Finished);
        }
        let seq = self.events.fetch_add();
        writeln!(self.out, "{:>4} {}{}", seq, "  ".repeat(self.depth), text)?;
        Ok(())
    }
}

fn describe(value: &dyn TrackedValue) -> String {
    format!("{} = {} [{:#x}]", value.name(), value.payload(), value.address())
}

impl<W: Write> EventRecorder for TextRecorder<W> {
    fn record_default_construct(&mut self, value: &dyn TrackedValue) -> Result<()> {
        self.line(&format!("{} <- {}", describe(value), OperationKind::DefaultCtor.label()))
    }

    fn record_value_construct(&mut self, value: &dyn TrackedValue) -> Result<()> {
        self.line(&format!("{} <- {}", describe(value), OperationKind::ValueCtor.label()))
    }

    fn record_copy_construct(&mut self, dst: &dyn TrackedValue, src: &dyn TrackedValue) -> Result<()> {
        self.line(&format!(
            "{} <- {}({})",
            describe(dst),
            OperationKind::CopyCtor.label(),
            src.name()
        ))
    }

    fn record_move_construct_begin(&mut self, src: &dyn TrackedValue) -> Result<MoveToken> {
        let op = self.events.issued();
        self.line(&format!("{} begins from {}", OperationKind::MoveCtor.label(), describe(src)))?;
        Ok(MoveToken::new(NodeId(op), MoveKind::Construct))
    }

    fn record_move_construct_end(
        &mut self,
        dst: &dyn TrackedValue,
        src: &dyn TrackedValue,
        token: MoveToken,
    ) -> Result<()> {
        self.line(&format!(
            "{} <- {}#{}, {} invalidated",
            describe(dst),
            OperationKind::MoveCtor.label(),
            token.operation(),
            describe(src)
        ))
    }

    fn record_destruct(&mut self, value: &dyn TrackedValue) -> Result<()> {
        self.line(&format!("~{}", describe(value)))
    }

    fn record_copy_assign(&mut self, dst: &dyn TrackedValue, src: &dyn TrackedValue) -> Result<()> {
        self.line(&format!(
            "{} <- {}({})",
            describe(dst),
            OperationKind::CopyAssign.label(),
            src.name()
        ))
    }

    fn record_move_assign_begin(&mut self, src: &dyn TrackedValue) -> Result<MoveToken> {
        let op = self.events.issued();
        self.line(&format!("{} begins from {}", OperationKind::MoveAssign.label(), describe(src)))?;
        Ok(MoveToken::new(NodeId(op), MoveKind::Assign))
    }

    fn record_move_assign_end(
        &mut self,
        dst: &dyn TrackedValue,
        src: &dyn TrackedValue,
        token: MoveToken,
    ) -> Result<()> {
        self.line(&format!(
            "{} <- {}#{}, {} invalidated",
            describe(dst),
            OperationKind::MoveAssign.label(),
            token.operation(),
            describe(src)
        ))
    }

    fn record_unary_op(
        &mut self,
        result: &dyn TrackedValue,
        operand: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()> {
        self.line(&format!("{} <- {}{}", describe(result), symbol, operand.name()))
    }

    fn record_binary_op(
        &mut self,
        result: &dyn TrackedValue,
        lhs: &dyn TrackedValue,
        rhs: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()> {
        self.line(&format!(
            "{} <- {} {} {}",
            describe(result),
            lhs.name(),
            symbol,
            rhs.name()
        ))
    }

    fn record_binary_assign_op(
        &mut self,
        result: &dyn TrackedValue,
        other: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()> {
        self.line(&format!("{} <- {} {}", describe(result), symbol, other.name()))
    }

    fn record_function_entry(&mut self, name: &str) -> Result<()> {
        self.line(&format!("{} {{", name))?;
        self.depth += 1;
        Ok(())
    }

    fn record_function_exit(&mut self) -> Result<()> {
        if self.depth == 0 {
            tracing::warn!("function exit without a matching entry, ignored");
            return Ok(());
        }
        self.depth -= 1;
        self.line("}")
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn teardown(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        while self.depth > 0 {
            self.record_function_exit()?;
        }
        self.finished = true;
        self.out.flush()?;
        tracing::info!(events = self.events.issued(), "event log written");
        Ok(())
    }
}

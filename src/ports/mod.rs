use crate::domain::graph::GraphSnapshot;
use crate::domain::ids::NodeId;
use crate::domain::value::TrackedValue;
use crate::error::Result;

/// Which two-phase event a [`MoveToken`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Construct,
    Assign,
}

/// Opaque handle returned by a move `begin` call and consumed by the
/// matching `end` call.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a move token must be passed to the matching end call"]
pub struct MoveToken {
    op: NodeId,
    kind: MoveKind,
}

impl MoveToken {
    pub(crate) fn new(op: NodeId, kind: MoveKind) -> Self {
        Self { op, kind }
    }

    pub(crate) fn operation(&self) -> NodeId {
        self.op
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }
}

/// Sink for the lifecycle and operator events of tracked values.
///
/// Calls are observational: implementations read the values passed in and
/// never mutate them. Errors are I/O failures on the output only.
///
/// Move events come in two phases. `*_begin` is called while the source
/// still holds its pre-move state; `*_end` after the move has happened, with
/// the token returned by `*_begin`.
pub trait EventRecorder {
    fn record_default_construct(&mut self, value: &dyn TrackedValue) -> Result<()>;
    fn record_value_construct(&mut self, value: &dyn TrackedValue) -> Result<()>;
    fn record_copy_construct(&mut self, dst: &dyn TrackedValue, src: &dyn TrackedValue) -> Result<()>;
    fn record_move_construct_begin(&mut self, src: &dyn TrackedValue) -> Result<MoveToken>;
    fn record_move_construct_end(
        &mut self,
        dst: &dyn TrackedValue,
        src: &dyn TrackedValue,
        token: MoveToken,
    ) -> Result<()>;
    fn record_destruct(&mut self, value: &dyn TrackedValue) -> Result<()>;

    fn record_copy_assign(&mut self, dst: &dyn TrackedValue, src: &dyn TrackedValue) -> Result<()>;
    fn record_move_assign_begin(&mut self, src: &dyn TrackedValue) -> Result<MoveToken>;
    fn record_move_assign_end(
        &mut self,
        dst: &dyn TrackedValue,
        src: &dyn TrackedValue,
        token: MoveToken,
    ) -> Result<()>;

    fn record_unary_op(
        &mut self,
        result: &dyn TrackedValue,
        operand: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()>;
    fn record_binary_op(
        &mut self,
        result: &dyn TrackedValue,
        lhs: &dyn TrackedValue,
        rhs: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()>;
    /// `result` is the left-hand side after a compound assignment like `+=`.
    fn record_binary_assign_op(
        &mut self,
        result: &dyn TrackedValue,
        other: &dyn TrackedValue,
        symbol: &str,
    ) -> Result<()>;

    /// Open a grouping labeled `name`. Must be balanced by
    /// [`record_function_exit`](Self::record_function_exit).
    fn record_function_entry(&mut self, name: &str) -> Result<()>;
    /// Close the innermost open grouping.
    fn record_function_exit(&mut self) -> Result<()>;

    /// Current function nesting depth.
    fn depth(&self) -> usize;

    /// Flush buffered output and close the artifact. Idempotent.
    fn teardown(&mut self) -> Result<()>;

    /// Graph produced so far, for recorders that build one.
    fn snapshot(&self) -> Option<GraphSnapshot> {
        None
    }
}

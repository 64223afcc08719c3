//! Observed view of an instrumented value.
//!
//! The recorder never owns or mutates tracked values. It reads this view
//! at call time and keeps only the identity key.

use crate::domain::ids::Identity;

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Declared and named by the user.
    Named,
    /// Temporary produced by an expression, copy or conversion.
    Temporary,
}

impl Provenance {
    pub fn is_temporary(&self) -> bool {
        matches!(self, Provenance::Temporary)
    }
}

/// Anything the recorder can observe.
pub trait TrackedValue {
    fn identity(&self) -> Identity;
    fn name(&self) -> &str;
    fn payload(&self) -> i64;
    fn provenance(&self) -> Provenance;

    /// Memory address of the value at observation time.
    fn address(&self) -> usize;
}

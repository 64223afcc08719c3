//! Instrumented integer.
//!
//! `TracedInt` reports its lifecycle to a [`RecorderHandle`]:
//!
//! | operation | event |
//! |---|---|
//! | [`TracedInt::new`], [`TracedInt::temporary`] | value construct |
//! | [`TracedInt::default_named`] | default construct |
//! | [`TracedInt::copy_named`], `clone()` | copy construct |
//! | [`TracedInt::moved_from`] | move construct (two-phase) |
//! | [`TracedInt::assign`] | copy assign |
//! | [`TracedInt::assign_moved`] | move assign (two-phase) |
//! | `-x`, `!x` | unary operator |
//! | `a + b`, `a - b`, `a * b`, `a / b`, `a % b` | binary operator |
//! | `a += b`, ... | compound assignment |
//! | drop | destruct |
//!
//! A moved-from value is cleared to zero.
//!
//! Arithmetic wraps on overflow, including `i64::MIN / -1`. A zero divisor
//! panics like plain integer division, before any event is recorded.

use crate::application::session::RecorderHandle;
use crate::domain::ids::Identity;
use crate::domain::value::{Provenance, TrackedValue};
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Sub, SubAssign,
};

pub struct TracedInt {
    value: i64,
    name: String,
    provenance: Provenance,
    identity: Identity,
    recorder: RecorderHandle,
}

impl TracedInt {
    /// Named value, recorded as a value construction.
    pub fn new(recorder: &RecorderHandle, name: &str, value: i64) -> Self {
        let v = Self::unrecorded(recorder, Some(name), value);
        recorder.record(|r| r.record_value_construct(&v));
        v
    }

    /// Unnamed temporary, recorded as a value construction.
    pub fn temporary(recorder: &RecorderHandle, value: i64) -> Self {
        let v = Self::unrecorded(recorder, None, value);
        recorder.record(|r| r.record_value_construct(&v));
        v
    }

    /// Named zero, recorded as a default construction.
    pub fn default_named(recorder: &RecorderHandle, name: &str) -> Self {
        let v = Self::unrecorded(recorder, Some(name), 0);
        recorder.record(|r| r.record_default_construct(&v));
        v
    }

    /// Named copy of `self`.
    pub fn copy_named(&self, name: &str) -> Self {
        self.copy_as(Some(name))
    }

    /// Construct a new value by moving out of `src`, leaving it zeroed.
    pub fn moved_from(src: &mut TracedInt, name: Option<&str>) -> Self {
        let recorder = src.recorder.clone();
        let token = recorder.record(|r| r.record_move_construct_begin(src));

        let value = std::mem::take(&mut src.value);
        let dst = Self::unrecorded(&recorder, name, value);

        if let Some(token) = token {
            recorder.record(|r| r.record_move_construct_end(&dst, src, token));
        }
        dst
    }

    /// Copy assignment.
    pub fn assign(&mut self, src: &TracedInt) {
        self.value = src.value;
        let recorder = self.recorder.clone();
        recorder.record(|r| r.record_copy_assign(self, src));
    }

    /// Move assignment, leaving `src` zeroed.
    pub fn assign_moved(&mut self, src: &mut TracedInt) {
        let recorder = self.recorder.clone();
        let token = recorder.record(|r| r.record_move_assign_begin(src));

        self.value = std::mem::take(&mut src.value);

        if let Some(token) = token {
            recorder.record(|r| r.record_move_assign_end(self, src, token));
        }
    }

    pub fn get(&self) -> i64 {
        self.value
    }

    pub fn recorder(&self) -> &RecorderHandle {
        &self.recorder
    }

    fn unrecorded(recorder: &RecorderHandle, name: Option<&str>, value: i64) -> Self {
        let identity = recorder.next_identity();
        let (name, provenance) = match name {
            Some(name) => (name.to_string(), Provenance::Named),
            None => (format!("tmp{}", identity.0), Provenance::Temporary),
        };
        Self {
            value,
            name,
            provenance,
            identity,
            recorder: recorder.clone(),
        }
    }

    fn copy_as(&self, name: Option<&str>) -> Self {
        let dst = Self::unrecorded(&self.recorder, name, self.value);
        self.recorder.record(|r| r.record_copy_construct(&dst, self));
        dst
    }

    fn unary(&self, value: i64, symbol: &str) -> Self {
        let result = Self::unrecorded(&self.recorder, None, value);
        self.recorder.record(|r| r.record_unary_op(&result, self, symbol));
        result
    }

    fn binary(&self, rhs: &TracedInt, value: i64, symbol: &str) -> Self {
        let result = Self::unrecorded(&self.recorder, None, value);
        self.recorder
            .record(|r| r.record_binary_op(&result, self, rhs, symbol));
        result
    }

    fn binary_assign(&mut self, other: &TracedInt, value: i64, symbol: &str) {
        self.value = value;
        let recorder = self.recorder.clone();
        recorder.record(|r| r.record_binary_assign_op(self, other, symbol));
    }
}

impl TrackedValue for TracedInt {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn payload(&self) -> i64 {
        self.value
    }

    fn provenance(&self) -> Provenance {
        self.provenance
    }

    fn address(&self) -> usize {
        self as *const Self as usize
    }
}

impl Clone for TracedInt {
    fn clone(&self) -> Self {
        self.copy_as(None)
    }
}

impl Drop for TracedInt {
    fn drop(&mut self) {
        let recorder = self.recorder.clone();
        recorder.record(|r| r.record_destruct(self));
    }
}

impl fmt::Debug for TracedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedInt")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("identity", &self.identity)
            .finish()
    }
}

impl fmt::Display for TracedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $symbol:literal, $apply:expr) => {
        impl $trait<&TracedInt> for &TracedInt {
            type Output = TracedInt;

            fn $method(self, rhs: &TracedInt) -> TracedInt {
                let apply: fn(i64, i64) -> i64 = $apply;
                self.binary(rhs, apply(self.value, rhs.value), $symbol)
            }
        }

        impl $trait for TracedInt {
            type Output = TracedInt;

            fn $method(self, rhs: TracedInt) -> TracedInt {
                $trait::$method(&self, &rhs)
            }
        }
    };
}

binary_operator!(Add, add, "+", |a, b| a.wrapping_add(b));
binary_operator!(Sub, sub, "-", |a, b| a.wrapping_sub(b));
binary_operator!(Mul, mul, "*", |a, b| a.wrapping_mul(b));
binary_operator!(Div, div, "/", |a, b| a.wrapping_div(b));
binary_operator!(Rem, rem, "%", |a, b| a.wrapping_rem(b));

macro_rules! assign_operator {
    ($trait:ident, $method:ident, $symbol:literal, $apply:expr) => {
        impl $trait<&TracedInt> for TracedInt {
            fn $method(&mut self, rhs: &TracedInt) {
                let apply: fn(i64, i64) -> i64 = $apply;
                let value = apply(self.value, rhs.value);
                self.binary_assign(rhs, value, $symbol);
            }
        }
    };
}

assign_operator!(AddAssign, add_assign, "+=", |a, b| a.wrapping_add(b));
assign_operator!(SubAssign, sub_assign, "-=", |a, b| a.wrapping_sub(b));
assign_operator!(MulAssign, mul_assign, "*=", |a, b| a.wrapping_mul(b));
assign_operator!(DivAssign, div_assign, "/=", |a, b| a.wrapping_div(b));
assign_operator!(RemAssign, rem_assign, "%=", |a, b| a.wrapping_rem(b));

impl Neg for &TracedInt {
    type Output = TracedInt;

    fn neg(self) -> TracedInt {
        self.unary(self.value.wrapping_neg(), "-")
    }
}

impl Not for &TracedInt {
    type Output = TracedInt;

    fn not(self) -> TracedInt {
        self.unary(!self.value, "!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::edge::EdgeStyle;
    use crate::infrastructure::{GraphBuilder, GraphOptions};

    fn handle() -> RecorderHandle {
        let builder = GraphBuilder::new(Vec::new(), GraphOptions::default()).unwrap();
        RecorderHandle::new(Box::new(builder))
    }

    #[test]
    fn test_values_follow_integer_semantics() {
        let h = handle();
        let a = TracedInt::new(&h, "a", 6);
        let b = TracedInt::new(&h, "b", 7);
        assert_eq!((&a * &b).get(), 42);
        assert_eq!((&b - &a).get(), 1);
        assert_eq!((&b % &a).get(), 1);
        assert_eq!((-&a).get(), -6);

        let mut c = a.copy_named("c");
        c += &b;
        assert_eq!(c.get(), 13);
    }

    #[test]
    fn test_division_overflow_wraps() {
        let h = handle();
        let min = TracedInt::new(&h, "min", i64::MIN);
        let neg = TracedInt::new(&h, "neg", -1);
        assert_eq!((&min / &neg).get(), i64::MIN);
        assert_eq!((&min % &neg).get(), 0);
        assert_eq!((&min * &neg).get(), i64::MIN);

        let mut c = min.copy_named("c");
        c /= &neg;
        assert_eq!(c.get(), i64::MIN);
        c %= &neg;
        assert_eq!(c.get(), 0);

        let snap = h.snapshot().unwrap();
        assert_eq!(snap.operations_labeled("/").count(), 1);
        assert_eq!(snap.operations_labeled("/=").count(), 1);
    }

    #[test]
    #[should_panic(expected = "divide by zero")]
    fn test_zero_divisor_panics() {
        let h = handle();
        let a = TracedInt::new(&h, "a", 1);
        let zero = TracedInt::new(&h, "zero", 0);
        let _ = &a / &zero;
    }

    #[test]
    fn test_move_clears_source() {
        let h = handle();
        let mut a = TracedInt::new(&h, "a", 42);
        let b = TracedInt::moved_from(&mut a, Some("b"));
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 42);

        let snap = h.snapshot().unwrap();
        assert_eq!(snap.operations_labeled("MoveCtor").count(), 1);
        assert_eq!(snap.edges_styled(EdgeStyle::Tapered).count(), 1);
    }

    #[test]
    fn test_clone_is_temporary_copy() {
        let h = handle();
        let a = TracedInt::new(&h, "a", 1);
        let t = a.clone();
        assert_eq!(t.provenance(), Provenance::Temporary);
        assert!(t.name().starts_with("tmp"));
        assert_ne!(t.identity(), a.identity());

        let snap = h.snapshot().unwrap();
        assert_eq!(snap.operations_labeled("CopyCtor").count(), 1);
    }

    #[test]
    fn test_drop_records_final_occurrence() {
        let h = handle();
        {
            let _a = TracedInt::new(&h, "a", 5);
        }
        let snap = h.snapshot().unwrap();
        assert_eq!(snap.occurrences_of("a").count(), 2);
        assert_eq!(snap.edges_styled(EdgeStyle::Dotted).count(), 1);
    }

    #[test]
    fn test_binary_op_links_both_operands() {
        let h = handle();
        let a = TracedInt::new(&h, "a", 2);
        let b = TracedInt::new(&h, "b", 3);
        let _sum = &a + &b;

        let snap = h.snapshot().unwrap();
        let plus = snap.operations_labeled("+").next().unwrap().id;
        let a_node = snap.occurrences_of("a").next().unwrap().id;
        let b_node = snap.occurrences_of("b").next().unwrap().id;
        assert!(snap.has_edge(a_node, plus, EdgeStyle::Plain));
        assert!(snap.has_edge(b_node, plus, EdgeStyle::Plain));
    }
}

//! Demonstration programs.
//!
//! Each scenario drives [`TracedInt`] through a small piece of code whose
//! copy/move behaviour is worth looking at as a graph.

use crate::application::session::RecorderHandle;
use crate::application::traced_int::TracedInt;
use crate::trace_fn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// Moving out of a plain value, a reborrow and a nested reborrow
    MoveCheck,
    /// Allocating through a forwarding helper, by value and by copy
    Forward,
    /// Passing a value into a by-value setter that move-assigns it
    Setter,
    /// Borrowing setter that copy-assigns next to an owning one that moves
    Overload,
    /// One generic function copying from borrowed and moving from owned input
    Generic,
    /// Swapping two values through a moved-into temporary
    Swap,
    /// Arithmetic and compound assignment
    Arithmetic,
}

impl Scenario {
    pub fn run(&self, handle: &RecorderHandle) {
        trace_fn!(handle);
        match self {
            Scenario::MoveCheck => move_check(handle),
            Scenario::Forward => forward(handle),
            Scenario::Setter => setter(handle),
            Scenario::Overload => overload(handle),
            Scenario::Generic => generic(handle),
            Scenario::Swap => swap_values(handle),
            Scenario::Arithmetic => arithmetic(handle),
        }
    }
}

fn move_check(handle: &RecorderHandle) {
    trace_fn!(handle);

    let mut clear = TracedInt::new(handle, "clear", 42);

    let mut for_ref = TracedInt::new(handle, "for_ref", 42);
    let by_ref = &mut for_ref;

    let mut for_nested = TracedInt::new(handle, "for_nested", 42);
    let outer = &mut for_nested;
    let nested = &mut *outer;

    let _clear_result = TracedInt::moved_from(&mut clear, Some("clear_result"));
    let _ref_result = TracedInt::moved_from(by_ref, Some("ref_result"));
    let _nested_result = TracedInt::moved_from(nested, Some("nested_result"));
}

fn allocate(handle: &RecorderHandle, mut arg: TracedInt) -> Box<TracedInt> {
    trace_fn!(handle);
    Box::new(TracedInt::moved_from(&mut arg, None))
}

fn allocate_copy(handle: &RecorderHandle, arg: &TracedInt) -> Box<TracedInt> {
    trace_fn!(handle);
    Box::new(arg.clone())
}

fn forward(handle: &RecorderHandle) {
    trace_fn!(handle);

    let moved = allocate(handle, TracedInt::temporary(handle, 42));
    drop(moved);

    let a = TracedInt::new(handle, "a", 42);
    let copied = allocate_copy(handle, &a);
    drop(copied);
}

struct Cat {
    happiness: TracedInt,
}

impl Cat {
    fn new(handle: &RecorderHandle) -> Self {
        Self {
            happiness: TracedInt::default_named(handle, "happiness"),
        }
    }

    fn set_happiness(&mut self, mut happiness: TracedInt) {
        trace_fn!(self.happiness.recorder());
        self.happiness.assign_moved(&mut happiness);
    }

    fn set_happiness_from(&mut self, happiness: &TracedInt) {
        trace_fn!(self.happiness.recorder());
        self.happiness.assign(happiness);
    }
}

fn setter(handle: &RecorderHandle) {
    trace_fn!(handle);

    let a = TracedInt::new(handle, "a", 42);
    let mut cat = Cat::new(handle);
    cat.set_happiness(a.clone());
    cat.set_happiness(TracedInt::temporary(handle, 0));
}

fn overload(handle: &RecorderHandle) {
    trace_fn!(handle);

    let a = TracedInt::new(handle, "a", 42);
    let mut cat = Cat::new(handle);
    cat.set_happiness_from(&a);
    cat.set_happiness(TracedInt::temporary(handle, 0));
}

/// Borrowed sources are copied, owned ones are moved.
trait AssignInto {
    fn assign_into(self, dst: &mut TracedInt);
}

impl AssignInto for &TracedInt {
    fn assign_into(self, dst: &mut TracedInt) {
        dst.assign(self);
    }
}

impl AssignInto for TracedInt {
    fn assign_into(mut self, dst: &mut TracedInt) {
        dst.assign_moved(&mut self);
    }
}

fn store<T: AssignInto>(handle: &RecorderHandle, object: T) {
    trace_fn!(handle);
    let mut dst = TracedInt::default_named(handle, "dst");
    object.assign_into(&mut dst);
}

fn generic(handle: &RecorderHandle) {
    trace_fn!(handle);

    let a = TracedInt::new(handle, "a", 42);
    store(handle, &a);
    store(handle, TracedInt::temporary(handle, 0));
}

fn swap(a: &mut TracedInt, b: &mut TracedInt) {
    trace_fn!(a.recorder().clone());
    let mut c = TracedInt::moved_from(a, Some("c"));
    a.assign_moved(b);
    b.assign_moved(&mut c);
}

fn swap_values(handle: &RecorderHandle) {
    trace_fn!(handle);

    let mut a = TracedInt::new(handle, "a", 1);
    let mut b = TracedInt::new(handle, "b", 2);
    swap(&mut a, &mut b);
}

fn arithmetic(handle: &RecorderHandle) {
    trace_fn!(handle);

    let a = TracedInt::new(handle, "a", 6);
    let b = TracedInt::new(handle, "b", 7);
    let mut c = TracedInt::moved_from(&mut (&a * &b), Some("c"));
    c += &a;
    c -= &b;
    let _d = -&c;
    let mut e = TracedInt::default_named(handle, "e");
    e.assign(&c);
}

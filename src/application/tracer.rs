//! Scoped function tracing.
//!
//! A [`FunctionTracer`] records a function entry when created and the
//! matching exit when dropped, so early returns, `?` and unwinding all keep
//! the groupings balanced.

use crate::application::session::RecorderHandle;

#[must_use = "the function grouping closes as soon as the tracer is dropped"]
pub struct FunctionTracer {
    handle: RecorderHandle,
    entered: bool,
}

impl FunctionTracer {
    pub fn enter(handle: &RecorderHandle, name: &str) -> Self {
        let entered = handle.record(|r| r.record_function_entry(name)).is_some();
        Self {
            handle: handle.clone(),
            entered,
        }
    }
}

impl Drop for FunctionTracer {
    fn drop(&mut self) {
        if self.entered {
            self.handle.record(|r| r.record_function_exit());
        }
    }
}

/// Short name of the enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.rsplit("::").next().unwrap_or(name)
    }};
}

/// Trace the enclosing function until the end of its body.
///
/// ```ignore
/// fn set_value(handle: &RecorderHandle) {
///     lifetrace::trace_fn!(handle);
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! trace_fn {
    ($handle:expr) => {
        let _lifetrace_tracer =
            $crate::application::FunctionTracer::enter(&$handle, $crate::function_name!());
    };
}

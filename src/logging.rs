//! Feature-gated tracing for the slicing engine.
//!
//! Mirrors the teacher's per-subsystem logging macros: a single macro per
//! concern, expanding to `saying::say!` when its feature is enabled and to
//! nothing otherwise, so the instrumentation is genuinely zero-cost when off.

#[macro_export]
#[cfg(feature = "show_slice_trace")]
macro_rules! slice_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_slice_trace"))]
macro_rules! slice_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

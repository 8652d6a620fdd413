//! Trace utilities

/// Trace category for lifecycle phase changes.
pub const LIFECYCLE: &str = "lifecycle";
/// Trace category for deferred state transitions.
pub const DEFERRAL: &str = "deferral";
/// Trace category for system-under-test acquisition.
pub const SUT: &str = "sut";

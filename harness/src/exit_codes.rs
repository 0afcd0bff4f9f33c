//! Stable exit codes for the harness binary.

/// Routine ran and its encoded result was written to stdout.
pub const OK: i32 = 0;
/// Missing or unknown routine name, malformed input, or a failed write.
pub const INVALID: i32 = 1;

//! Exit code constants for the runnel CLI.
//!
//! These cover the CLI's own failures. When a command actually runs to
//! completion, the CLI exits with the child's exit code instead.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, malformed key=value pairs, config problems.
pub const USER_ERROR: i32 = 1;

/// An explicitly requested backend is not available on this platform.
pub const UNAVAILABLE_BACKEND: i32 = 2;

/// The OS refused to create or reap the process.
pub const SPAWN_FAILURE: i32 = 3;

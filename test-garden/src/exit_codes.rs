//! Stable exit codes for the `test-garden` demo binary.

/// Every selected suite ran without failures or errors.
pub const OK: i32 = 0;
/// At least one suite recorded a failed assertion or an error.
pub const FAILED: i32 = 1;
/// Invalid configuration, bad pattern, or a run aborted by the engine.
pub const INVALID: i32 = 2;

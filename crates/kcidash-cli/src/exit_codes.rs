//! Process exit codes. Scripts branch on these, keep them stable.

pub const EXIT_SUCCESS: i32 = 0;
pub const EMPTY_RESULT: i32 = 1; // Lookup succeeded but matched nothing
pub const INVALID_INPUT: i32 = 2; // Bad request body, parameter or config
pub const INTERNAL_ERROR: i32 = 3; // Store or serialization failure

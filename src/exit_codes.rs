//! Exit code constants for the gitmeta CLI.
//!
//! - 0: Success (also used for soft failures, so the build continues)
//! - 1: Hard build failure (repository or output errors)
//! - 2: Configuration error (bad flags, unreadable or invalid config file)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Hard build failure: the surrounding build must stop.
pub const BUILD_FAILURE: i32 = 1;

/// Configuration error: malformed or missing settings.
pub const CONFIG_ERROR: i32 = 2;

/// Exit code indicating success.
pub const SUCCESS: i32 = 0;

/// Exit code for general errors.
pub const GENERAL_ERROR: i32 = 1;

/// Exit code for invalid or conflicting command options.
pub const USAGE_ERROR: i32 = 2;

/// Exit code for a run that was stopped by cancellation.
pub const CANCELLED: i32 = 130;

//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Input error - bad chart path or output path
pub const INPUT_ERROR: i32 = 2;

/// Chart error - unreadable archive or invalid values.yaml
pub const CHART_ERROR: i32 = 4;

/// IO error - output could not be written
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;

//! Exit codes shared by the dispatcher and the binary

pub const EXIT_SUCCESS: i32 = 0;
/// Configuration or subcommand handler failure
pub const EXIT_FAILURE: i32 = 1;
/// Routing error, invalid global setting, or subcommand usage error
pub const EXIT_USAGE: i32 = 2;

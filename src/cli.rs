//! Command-line routing and dispatch

pub mod commands;
pub mod common;
pub mod dispatch;
pub mod options;
pub mod router;
pub mod usage;

// Re-export types for convenient access
pub use dispatch::{
    GlobalSettings, InvocationReporter, SubcommandHandler, collect_argv, dispatch, run,
};
pub use options::{
    ExitAction, ExitRequest, OptionDefinition, OptionMap, OptionPhase, OptionScan, OptionTable,
    OptionValue, ParsedOptions, parse_options,
};
pub use router::{Router, Routing, RoutingResult};

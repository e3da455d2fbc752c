#![forbid(unsafe_code)]

//! dapp: entry-point dispatcher for the dapp build tool
//!
//! The dispatcher splits the process argv into global options, a single
//! subcommand name and the arguments owned by that subcommand, then hands
//! the untouched suffix to the subcommand's handler.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, DappError, DispatchError};

// Re-export core domain types for convenient access
pub use types::{ColorOption, OutputFormat, Subcommand};

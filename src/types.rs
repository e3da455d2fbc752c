#![forbid(unsafe_code)]

//! Core domain types for dapp
//!
//! This module defines the subcommand set and the typed values behind the
//! global settings.

use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subcommands recognized by the dispatcher
///
/// Names are matched exactly and case-sensitively; see [`Subcommand::ALL`]
/// for the fixed order used in usage output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subcommand {
    Build,
    Push,
    Spush,
    List,
    Run,
    Stages,
    Cleanup,
    Bp,
}

impl Subcommand {
    /// Every recognized subcommand, in declaration order
    pub const ALL: [Subcommand; 8] = [
        Subcommand::Build,
        Subcommand::Push,
        Subcommand::Spush,
        Subcommand::List,
        Subcommand::Run,
        Subcommand::Stages,
        Subcommand::Cleanup,
        Subcommand::Bp,
    ];

    /// Returns the name as typed on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Build => "build",
            Subcommand::Push => "push",
            Subcommand::Spush => "spush",
            Subcommand::List => "list",
            Subcommand::Run => "run",
            Subcommand::Stages => "stages",
            Subcommand::Cleanup => "cleanup",
            Subcommand::Bp => "bp",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subcommand {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subcommand::ALL
            .into_iter()
            .find(|subcommand| subcommand.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownSubcommand(s.to_string()))
    }
}

/// When to emit colored output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorOption {
    pub const VARIANTS: &'static str = "auto, always, never";
}

impl FromStr for ColorOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorOption::Auto),
            "always" => Ok(ColorOption::Always),
            "never" => Ok(ColorOption::Never),
            other => Err(format!("invalid color choice '{}'", other)),
        }
    }
}

/// Output format for invocation reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl OutputFormat {
    pub const VARIANTS: &'static str = "human, jsonl";
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(OutputFormat::Human),
            "jsonl" => Ok(OutputFormat::Jsonl),
            other => Err(format!("invalid output format '{}'", other)),
        }
    }
}

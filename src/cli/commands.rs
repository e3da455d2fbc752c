//! Per-subcommand argument parsers
//!
//! Each subcommand owns a clap parser that consumes exactly the suffix the
//! router handed over. Parsers are built with `no_binary_name`, so the
//! suffix is passed as-is.

use crate::types::Subcommand;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser};
use serde::Serialize;
use std::path::PathBuf;

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonArgs {
    /// Directory containing the Dappfile
    #[arg(long, value_name = "PATH")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Build application images
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "build", bin_name = "dapp build", no_binary_name = true)]
pub struct BuildArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: CommonArgs,

    /// Pull base images before building
    #[arg(long)]
    pub pull: bool,

    /// Application name patterns (all applications when omitted)
    #[arg(value_name = "APPS PATTERN")]
    pub patterns: Vec<String>,
}

/// Build and push application images
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "bp", bin_name = "dapp bp", no_binary_name = true)]
pub struct BpArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: CommonArgs,

    /// Pull base images before building
    #[arg(long)]
    pub pull: bool,

    /// Application name patterns followed by the target repository
    #[arg(value_name = "[APPS PATTERN ...] REPO", required = true)]
    #[serde(skip)]
    pub targets: Vec<String>,
}

/// Push one application image
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "push", bin_name = "dapp push", no_binary_name = true)]
pub struct PushArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: CommonArgs,

    /// Optional application pattern followed by the target repository
    #[arg(value_name = "[APP PATTERN] REPO", required = true)]
    #[serde(skip)]
    pub targets: Vec<String>,
}

/// Push application images with their stage cache
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "spush", bin_name = "dapp spush", no_binary_name = true)]
pub struct SpushArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: CommonArgs,

    /// Application name patterns followed by the target repository
    #[arg(value_name = "[APPS PATTERN ...] REPO", required = true)]
    #[serde(skip)]
    pub targets: Vec<String>,
}

/// List applications
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "list", bin_name = "dapp list", no_binary_name = true)]
pub struct ListArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: CommonArgs,

    /// Application name patterns
    #[arg(value_name = "APPS PATTERN")]
    pub patterns: Vec<String>,
}

/// Run an application container
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "run", bin_name = "dapp run", no_binary_name = true)]
pub struct RunArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: CommonArgs,

    /// Application name pattern
    #[arg(value_name = "APP PATTERN")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_pattern: Option<String>,

    /// Arguments passed through to `docker run`
    #[arg(
        value_name = "DOCKER ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub docker_args: Vec<String>,
}

/// Show build stages
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "stages", bin_name = "dapp stages", no_binary_name = true)]
pub struct StagesArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: CommonArgs,
}

/// Remove images of applications
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "cleanup", bin_name = "dapp cleanup", no_binary_name = true)]
pub struct CleanupArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: CommonArgs,

    /// Application name patterns
    #[arg(value_name = "APPS PATTERN")]
    pub patterns: Vec<String>,
}

/// Patterns and repository split from `[APPS PATTERN ...] REPO`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Targets {
    pub patterns: Vec<String>,
    pub repo: String,
}

impl Targets {
    /// Splits positionals so the last one is the repository
    ///
    /// Returns `None` for an empty list.
    pub fn split(positionals: &[String]) -> Option<Self> {
        let (repo, patterns) = positionals.split_last()?;
        Some(Targets {
            patterns: patterns.to_vec(),
            repo: repo.clone(),
        })
    }
}

/// Arguments of a subcommand that ends in `[APPS PATTERN ...] REPO`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Targeted<A> {
    #[serde(flatten)]
    pub args: A,
    #[serde(flatten)]
    pub targets: Targets,
}

/// A subcommand with its arguments resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "subcommand", rename_all = "lowercase")]
pub enum Invocation {
    Build(BuildArgs),
    Bp(Targeted<BpArgs>),
    Push(Targeted<PushArgs>),
    Spush(Targeted<SpushArgs>),
    List(ListArgs),
    Run(RunArgs),
    Stages(StagesArgs),
    Cleanup(CleanupArgs),
}

impl Invocation {
    /// Parses a subcommand's suffix with that subcommand's parser
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments; `--help` also surfaces
    /// as a clap error of kind `DisplayHelp`.
    pub fn parse(subcommand: Subcommand, args: &[String]) -> Result<Self, clap::Error> {
        let invocation = match subcommand {
            Subcommand::Build => Invocation::Build(BuildArgs::try_parse_from(args)?),
            Subcommand::Bp => {
                let args = BpArgs::try_parse_from(args)?;
                let targets = split_targets::<BpArgs>(&args.targets)?;
                Invocation::Bp(Targeted { args, targets })
            }
            Subcommand::Push => {
                let args = PushArgs::try_parse_from(args)?;
                if args.targets.len() > 2 {
                    return Err(PushArgs::command().error(
                        ErrorKind::TooManyValues,
                        "push accepts at most one application pattern and a repository",
                    ));
                }
                let targets = split_targets::<PushArgs>(&args.targets)?;
                Invocation::Push(Targeted { args, targets })
            }
            Subcommand::Spush => {
                let args = SpushArgs::try_parse_from(args)?;
                let targets = split_targets::<SpushArgs>(&args.targets)?;
                Invocation::Spush(Targeted { args, targets })
            }
            Subcommand::List => Invocation::List(ListArgs::try_parse_from(args)?),
            Subcommand::Run => Invocation::Run(RunArgs::try_parse_from(args)?),
            Subcommand::Stages => Invocation::Stages(StagesArgs::try_parse_from(args)?),
            Subcommand::Cleanup => Invocation::Cleanup(CleanupArgs::try_parse_from(args)?),
        };
        Ok(invocation)
    }

    pub fn subcommand(&self) -> Subcommand {
        match self {
            Invocation::Build(_) => Subcommand::Build,
            Invocation::Bp(_) => Subcommand::Bp,
            Invocation::Push(_) => Subcommand::Push,
            Invocation::Spush(_) => Subcommand::Spush,
            Invocation::List(_) => Subcommand::List,
            Invocation::Run(_) => Subcommand::Run,
            Invocation::Stages(_) => Subcommand::Stages,
            Invocation::Cleanup(_) => Subcommand::Cleanup,
        }
    }

    pub fn common(&self) -> &CommonArgs {
        match self {
            Invocation::Build(args) => &args.common,
            Invocation::Bp(targeted) => &targeted.args.common,
            Invocation::Push(targeted) => &targeted.args.common,
            Invocation::Spush(targeted) => &targeted.args.common,
            Invocation::List(args) => &args.common,
            Invocation::Run(args) => &args.common,
            Invocation::Stages(args) => &args.common,
            Invocation::Cleanup(args) => &args.common,
        }
    }
}

fn split_targets<C: CommandFactory>(positionals: &[String]) -> Result<Targets, clap::Error> {
    Targets::split(positionals).ok_or_else(|| {
        C::command().error(
            ErrorKind::MissingRequiredArgument,
            "a target repository is required",
        )
    })
}

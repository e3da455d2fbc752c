//! Dispatch: turning a routing decision into process behaviour
//!
//! This is the only layer that prints version or help text, reports routing
//! errors and picks exit codes. Subcommand work is delegated to a
//! [`SubcommandHandler`], which receives the untouched suffix.

use crate::cli::commands::Invocation;
use crate::cli::common::{EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
use crate::cli::options::{ExitAction, ExitRequest, OptionMap, OptionTable};
use crate::cli::router::{Router, Routing, RoutingResult};
use crate::cli::usage;
use crate::config::Config;
use crate::error::{ConfigError, DappError, DispatchError};
use crate::output::{InvocationHumanFormatter, InvocationJsonlFormatter, color_choice};
use crate::types::{ColorOption, OutputFormat, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

/// Global settings resolved from the command line and dapp.toml
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalSettings {
    pub color: ColorOption,
    pub format: OutputFormat,
}

impl GlobalSettings {
    /// Command-line values win over configuration defaults
    ///
    /// # Errors
    ///
    /// Returns `DappError::InvalidSetting` when an option value is outside
    /// its accepted set.
    pub fn resolve(options: &OptionMap, config: &Config) -> Result<Self, DappError> {
        let color = match options.value("color") {
            Some(value) => parse_setting("color", value, ColorOption::VARIANTS)?,
            None => config.defaults.color.unwrap_or_default(),
        };
        let format = match options.value("format") {
            Some(value) => parse_setting("format", value, OutputFormat::VARIANTS)?,
            None => config.defaults.format.unwrap_or_default(),
        };
        Ok(GlobalSettings { color, format })
    }
}

fn parse_setting<T: FromStr>(option: &str, value: &str, expected: &str) -> Result<T, DappError> {
    value.parse().map_err(|_| DappError::InvalidSetting {
        option: option.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    })
}

/// Receiver of a routed subcommand
///
/// Implementations own `args` entirely, including their own `--help`.
pub trait SubcommandHandler {
    fn handle(
        &self,
        subcommand: Subcommand,
        args: &[String],
        settings: &GlobalSettings,
    ) -> Result<(), DappError>;
}

/// Handler that parses the suffix with the subcommand's parser and reports
/// the resolved invocation
#[derive(Debug, Default, Clone, Copy)]
pub struct InvocationReporter;

impl SubcommandHandler for InvocationReporter {
    fn handle(
        &self,
        subcommand: Subcommand,
        args: &[String],
        settings: &GlobalSettings,
    ) -> Result<(), DappError> {
        let invocation = Invocation::parse(subcommand, args)?;
        match settings.format {
            OutputFormat::Human => InvocationHumanFormatter::new(color_choice(settings.color))
                .write_to_stdout(&invocation),
            OutputFormat::Jsonl => InvocationJsonlFormatter::new().write_to_stdout(&invocation),
        }
    }
}

/// Run dapp with the process argv (program name excluded)
///
/// Returns the exit code for the process.
pub fn run<I>(args: I) -> i32
where
    I: IntoIterator<Item = OsString>,
{
    let argv = match collect_argv(args) {
        Ok(argv) => argv,
        Err(e) => return report_error(&e.into()),
    };
    dispatch(&argv, &InvocationReporter, || {
        let cwd = std::env::current_dir().map_err(|source| ConfigError::Read {
            path: PathBuf::from("."),
            source,
        })?;
        Config::discover(&cwd)
    })
}

/// Converts raw process arguments, rejecting any that are not valid UTF-8
///
/// The suffix is handed to subcommands verbatim, so a token is never
/// rewritten lossily.
///
/// # Errors
///
/// Returns `DispatchError::InvalidUnicode` for the first non-UTF-8 argument.
pub fn collect_argv<I>(args: I) -> Result<Vec<String>, DispatchError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| {
                DispatchError::InvalidUnicode(raw.to_string_lossy().into_owned())
            })
        })
        .collect()
}

/// Route `argv` and hand the suffix to `handler`
///
/// `load_config` is only called once a subcommand has been routed, so a
/// broken configuration never blocks `--version` or `--help`.
///
/// # Returns
///
/// Exit code:
/// - 0: Success, or version/help shown
/// - 1: Configuration or handler failure
/// - 2: Usage error
pub fn dispatch<H, F>(argv: &[String], handler: &H, load_config: F) -> i32
where
    H: SubcommandHandler + ?Sized,
    F: FnOnce() -> Result<Config, ConfigError>,
{
    let table = OptionTable::dapp();

    let routing = match Router::new(&table).route::<Subcommand>(argv) {
        Ok(routing) => routing,
        Err(e) => return report_error(&e.into()),
    };

    let result = match routing {
        Routing::Exit(exit) => return perform_exit(exit, &table),
        Routing::Routed(result) => result,
    };

    let Some(subcommand) = result.subcommand else {
        eprint!("{}", usage::render(&table));
        eprintln!();
        eprintln!("Error: {}", DispatchError::NoSubcommandGiven);
        return EXIT_USAGE;
    };

    match run_subcommand(subcommand, &result, handler, load_config) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn run_subcommand<H, F>(
    subcommand: Subcommand,
    result: &RoutingResult<'_, Subcommand>,
    handler: &H,
    load_config: F,
) -> Result<(), DappError>
where
    H: SubcommandHandler + ?Sized,
    F: FnOnce() -> Result<Config, ConfigError>,
{
    let config = load_config()?;
    let settings = GlobalSettings::resolve(&result.options, &config)?;
    handler.handle(subcommand, result.suffix(), &settings)
}

fn perform_exit(exit: ExitRequest, table: &OptionTable) -> i32 {
    match exit.action {
        ExitAction::ShowVersion => println!("{}", usage::version_line()),
        ExitAction::ShowHelp => print!("{}", usage::render(table)),
    }
    exit.code
}

fn report_error(err: &DappError) -> i32 {
    match err {
        DappError::Usage(e) => {
            if let Err(io) = e.print() {
                log::debug!("failed to print usage error: {}", io);
            }
            e.exit_code()
        }
        DappError::Dispatch(_) | DappError::InvalidSetting { .. } => {
            eprintln!("Error: {}", err);
            eprintln!("Run 'dapp --help' for usage.");
            EXIT_USAGE
        }
        _ => {
            eprintln!("Error: {}", err);
            EXIT_FAILURE
        }
    }
}

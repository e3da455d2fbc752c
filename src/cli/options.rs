//! Global option declarations and the option-prefix scanner
//!
//! Global options are declared as a table of [`OptionDefinition`] records.
//! The scanner walks argv from the left, consuming tokens that match a
//! declaration, and stops at the first positional token or at `--`.
//! Options are only recognized as a contiguous prefix.

use crate::error::DispatchError;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Where on the command line an option is recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionPhase {
    /// Only in the prefix before the subcommand token
    Head,
    /// Anywhere before a `--` marker, including after the subcommand token
    Tail,
}

/// Immediate action attached to an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction {
    ShowVersion,
    ShowHelp,
}

/// Request to stop processing, run an action and exit with `code`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRequest {
    pub action: ExitAction,
    pub code: i32,
}

/// One recognized global option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDefinition {
    /// Key in the parsed [`OptionMap`]
    pub name: &'static str,
    pub short: Option<char>,
    /// Long form without the leading dashes
    pub long: Option<&'static str>,
    pub description: &'static str,
    /// Placeholder shown in usage; `None` for boolean options
    pub value_name: Option<&'static str>,
    pub phase: OptionPhase,
    pub exit: Option<ExitRequest>,
}

impl OptionDefinition {
    /// Declares a boolean option
    pub fn flag(name: &'static str) -> Self {
        OptionDefinition {
            name,
            short: None,
            long: None,
            description: "",
            value_name: None,
            phase: OptionPhase::Head,
            exit: None,
        }
    }

    /// Declares an option that consumes the following token as its value
    pub fn value(name: &'static str, value_name: &'static str) -> Self {
        OptionDefinition {
            value_name: Some(value_name),
            ..OptionDefinition::flag(name)
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn long(mut self, long: &'static str) -> Self {
        self.long = Some(long);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Makes the option recognizable past the subcommand token
    pub fn tail(mut self) -> Self {
        self.phase = OptionPhase::Tail;
        self
    }

    pub fn exits_with(mut self, action: ExitAction, code: i32) -> Self {
        self.exit = Some(ExitRequest { action, code });
        self
    }

    pub fn is_boolean(&self) -> bool {
        self.value_name.is_none()
    }

    /// Renders the option forms for usage output, e.g. `-h, --help` or
    /// `    --color WHEN`
    pub fn forms(&self) -> String {
        let mut forms = match self.short {
            Some(short) => format!("-{}", short),
            None => "  ".to_string(),
        };
        if let Some(long) = self.long {
            forms.push_str(if self.short.is_some() { ", " } else { "  " });
            forms.push_str("--");
            forms.push_str(long);
        }
        if let Some(value_name) = self.value_name {
            forms.push(' ');
            forms.push_str(value_name);
        }
        forms
    }
}

/// Ordered, read-only set of global option definitions
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
    definitions: Vec<OptionDefinition>,
}

impl OptionTable {
    /// Creates a table; on duplicate forms the first declaration wins
    pub fn new(definitions: Vec<OptionDefinition>) -> Self {
        OptionTable { definitions }
    }

    /// Global options of the `dapp` command line
    ///
    /// `--help` is head-only so that `dapp build --help` reaches the
    /// subcommand's own parser; `--version` is honored anywhere before `--`.
    /// The router still honors a trailing `--help` after an unknown
    /// subcommand token.
    pub fn dapp() -> Self {
        OptionTable::new(vec![
            OptionDefinition::value("color", "WHEN")
                .long("color")
                .description("Colorize output: auto, always or never"),
            OptionDefinition::value("format", "FORMAT")
                .long("format")
                .description("Output format: human or jsonl"),
            OptionDefinition::flag("version")
                .long("version")
                .description("Show version")
                .tail()
                .exits_with(ExitAction::ShowVersion, 0),
            OptionDefinition::flag("help")
                .short('h')
                .long("help")
                .description("Show this message")
                .exits_with(ExitAction::ShowHelp, 0),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDefinition> {
        self.definitions.iter()
    }

    pub fn find_long(&self, long: &str) -> Option<&OptionDefinition> {
        self.definitions.iter().find(|d| d.long == Some(long))
    }

    pub fn find_short(&self, short: char) -> Option<&OptionDefinition> {
        self.definitions.iter().find(|d| d.short == Some(short))
    }

    /// Finds the first tail-phase exit option among `tokens`, stopping at `--`
    ///
    /// Only bare `--long` and `-s` forms count here; the tokens belong to a
    /// subcommand and are never parsed beyond this lookup.
    pub fn find_tail_exit(&self, tokens: &[String]) -> Option<ExitRequest> {
        self.scan_exits(tokens, |phase| phase == OptionPhase::Tail)
    }

    /// Like [`find_tail_exit`](Self::find_tail_exit), but head-phase exit
    /// options count too
    ///
    /// Used once the subcommand token is known to be invalid, when no
    /// subcommand parser is left to own a trailing `--help`.
    pub fn find_exit(&self, tokens: &[String]) -> Option<ExitRequest> {
        self.scan_exits(tokens, |_| true)
    }

    fn scan_exits(
        &self,
        tokens: &[String],
        accepts: impl Fn(OptionPhase) -> bool,
    ) -> Option<ExitRequest> {
        tokens
            .iter()
            .take_while(|token| token.as_str() != "--")
            .find_map(|token| {
                let definition = match classify(token) {
                    Token::Long { name, inline: None } => self.find_long(name),
                    Token::Short { flag, attached: "" } => self.find_short(flag),
                    _ => None,
                }?;
                if accepts(definition.phase) {
                    definition.exit
                } else {
                    None
                }
            })
    }
}

/// Parsed value of a global option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
}

/// Parsed global options keyed by [`OptionDefinition::name`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap(BTreeMap<&'static str, OptionValue>);

impl OptionMap {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    /// True if a boolean option was given
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(OptionValue::Bool(true)))
    }

    /// Value of a value-taking option, if given
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(OptionValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, &'static str, OptionValue> {
        self.0.iter()
    }

    fn insert(&mut self, name: &'static str, value: OptionValue) {
        if let Some(previous) = self.0.insert(name, value) {
            log::trace!("option '{}' repeated, dropping {:?}", name, previous);
        }
    }
}

/// Result of scanning an option prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionScan<'a> {
    Parsed(ParsedOptions<'a>),
    /// An exit-action option was reached; nothing after it was examined
    Exit(ExitRequest),
}

/// Options consumed from the front of an argv slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOptions<'a> {
    pub options: OptionMap,
    /// Tokens consumed as options, option values and `--`
    pub consumed: &'a [String],
    /// Tokens left untouched, starting at the first positional token
    pub rest: &'a [String],
}

/// Scans the option prefix of `args` against `table`
///
/// # Errors
///
/// Returns `DispatchError::UnknownOption` for an undeclared option-like token
/// and `DispatchError::MissingOptionValue` when a value-taking option is the
/// last token.
pub fn parse_options<'a>(
    args: &'a [String],
    table: &OptionTable,
) -> Result<OptionScan<'a>, DispatchError> {
    let mut scanner = OptionScanner::new(args, table);
    if let Some(exit) = scanner.scan()? {
        return Ok(OptionScan::Exit(exit));
    }
    let (consumed, rest) = args.split_at(scanner.position());
    Ok(OptionScan::Parsed(ParsedOptions {
        options: scanner.into_options(),
        consumed,
        rest,
    }))
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    EndOfOptions,
    Long { name: &'a str, inline: Option<&'a str> },
    Short { flag: char, attached: &'a str },
    Positional,
}

fn classify(token: &str) -> Token<'_> {
    if token == "--" {
        return Token::EndOfOptions;
    }
    if let Some(rest) = token.strip_prefix("--") {
        return match rest.split_once('=') {
            Some((name, value)) => Token::Long {
                name,
                inline: Some(value),
            },
            None => Token::Long {
                name: rest,
                inline: None,
            },
        };
    }
    if let Some(rest) = token.strip_prefix('-') {
        let mut chars = rest.chars();
        if let Some(flag) = chars.next() {
            return Token::Short {
                flag,
                attached: chars.as_str(),
            };
        }
    }
    Token::Positional
}

/// Stateful prefix scanner
///
/// `position()` always points at the first token not yet consumed, which
/// after an error is the offending token itself.
pub(crate) struct OptionScanner<'a, 't> {
    args: &'a [String],
    table: &'t OptionTable,
    pos: usize,
    options: OptionMap,
}

impl<'a, 't> OptionScanner<'a, 't> {
    pub(crate) fn new(args: &'a [String], table: &'t OptionTable) -> Self {
        OptionScanner {
            args,
            table,
            pos: 0,
            options: OptionMap::default(),
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn into_options(self) -> OptionMap {
        self.options
    }

    /// Consumes the option prefix, returning the exit request if one is hit
    pub(crate) fn scan(&mut self) -> Result<Option<ExitRequest>, DispatchError> {
        let args = self.args;
        let table = self.table;

        while let Some(token) = args.get(self.pos) {
            let (definition, inline) = match classify(token) {
                Token::Positional => break,
                Token::EndOfOptions => {
                    self.pos += 1;
                    break;
                }
                Token::Long { name, inline } => (table.find_long(name), inline),
                Token::Short { flag, attached } => {
                    let inline = (!attached.is_empty()).then_some(attached);
                    (table.find_short(flag), inline)
                }
            };
            let definition =
                definition.ok_or_else(|| DispatchError::UnknownOption(token.clone()))?;

            if let Some(exit) = self.consume(token, definition, inline)? {
                log::debug!("option '{}' requested {:?}", token, exit.action);
                return Ok(Some(exit));
            }
        }

        Ok(None)
    }

    fn consume(
        &mut self,
        token: &str,
        definition: &OptionDefinition,
        inline: Option<&str>,
    ) -> Result<Option<ExitRequest>, DispatchError> {
        let value = if definition.is_boolean() {
            if inline.is_some() {
                return Err(DispatchError::UnknownOption(token.to_string()));
            }
            self.pos += 1;
            OptionValue::Bool(true)
        } else if let Some(inline) = inline {
            self.pos += 1;
            OptionValue::Text(inline.to_string())
        } else {
            let value = self
                .args
                .get(self.pos + 1)
                .ok_or_else(|| DispatchError::MissingOptionValue(token.to_string()))?;
            self.pos += 2;
            OptionValue::Text(value.clone())
        };

        if definition.exit.is_some() {
            return Ok(definition.exit);
        }
        log::trace!("option '{}' = {:?}", definition.name, value);
        self.options.insert(definition.name, value);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn table_with_tag() -> OptionTable {
        OptionTable::new(vec![
            OptionDefinition::value("tag", "TAG")
                .short('t')
                .long("tag")
                .description("Image tag"),
            OptionDefinition::flag("quiet").short('q').long("quiet"),
            OptionDefinition::flag("version")
                .long("version")
                .tail()
                .exits_with(ExitAction::ShowVersion, 0),
            OptionDefinition::flag("help")
                .short('h')
                .long("help")
                .exits_with(ExitAction::ShowHelp, 0),
        ])
    }

    fn parsed(scan: OptionScan<'_>) -> ParsedOptions<'_> {
        match scan {
            OptionScan::Parsed(parsed) => parsed,
            OptionScan::Exit(exit) => panic!("Expected parsed options, got {:?}", exit),
        }
    }

    #[test]
    fn test_classify_tokens() {
        assert_eq!(classify("--"), Token::EndOfOptions);
        assert_eq!(
            classify("--tag"),
            Token::Long {
                name: "tag",
                inline: None
            }
        );
        assert_eq!(
            classify("--tag=v1"),
            Token::Long {
                name: "tag",
                inline: Some("v1")
            }
        );
        assert_eq!(
            classify("-tv1"),
            Token::Short {
                flag: 't',
                attached: "v1"
            }
        );
        assert_eq!(classify("-"), Token::Positional);
        assert_eq!(classify("build"), Token::Positional);
    }

    #[test]
    fn test_value_option_consumes_next_token() {
        let args = argv(&["--tag", "v1", "build"]);
        let parsed = parsed(parse_options(&args, &table_with_tag()).unwrap());
        assert_eq!(parsed.options.value("tag"), Some("v1"));
        assert_eq!(parsed.consumed, &args[..2]);
        assert_eq!(parsed.rest, &args[2..]);
    }

    #[test]
    fn test_inline_and_attached_values() {
        let table = table_with_tag();

        let args = argv(&["--tag=v2", "build"]);
        let result = parsed(parse_options(&args, &table).unwrap());
        assert_eq!(result.options.value("tag"), Some("v2"));
        assert_eq!(result.rest, &args[1..]);

        let args = argv(&["-tv3", "build"]);
        let result = parsed(parse_options(&args, &table).unwrap());
        assert_eq!(result.options.value("tag"), Some("v3"));
        assert_eq!(result.rest, &args[1..]);
    }

    #[test]
    fn test_value_may_look_like_an_option() {
        let args = argv(&["--tag", "--quiet", "list"]);
        let result = parsed(parse_options(&args, &table_with_tag()).unwrap());
        assert_eq!(result.options.value("tag"), Some("--quiet"));
        assert!(!result.options.flag("quiet"));
        assert_eq!(result.rest, &args[2..]);
    }

    #[test]
    fn test_boolean_option_records_true() {
        let args = argv(&["-q", "list"]);
        let result = parsed(parse_options(&args, &table_with_tag()).unwrap());
        assert!(result.options.flag("quiet"));
        assert_eq!(result.options.get("quiet"), Some(&OptionValue::Bool(true)));
        assert_eq!(result.options.len(), 1);
    }

    #[test]
    fn test_repeated_option_last_wins() {
        let args = argv(&["--tag", "a", "--tag", "b"]);
        let result = parsed(parse_options(&args, &table_with_tag()).unwrap());
        assert_eq!(result.options.value("tag"), Some("b"));
        assert!(result.rest.is_empty());
    }

    #[test]
    fn test_missing_option_value() {
        let args = argv(&["--tag"]);
        assert_eq!(
            parse_options(&args, &table_with_tag()),
            Err(DispatchError::MissingOptionValue("--tag".to_string()))
        );
    }

    #[test]
    fn test_unknown_option() {
        let args = argv(&["--bogus", "build"]);
        assert_eq!(
            parse_options(&args, &table_with_tag()),
            Err(DispatchError::UnknownOption("--bogus".to_string()))
        );

        let args = argv(&["-x"]);
        assert_eq!(
            parse_options(&args, &table_with_tag()),
            Err(DispatchError::UnknownOption("-x".to_string()))
        );
    }

    #[test]
    fn test_inline_value_on_boolean_is_rejected() {
        let args = argv(&["--quiet=yes"]);
        assert_eq!(
            parse_options(&args, &table_with_tag()),
            Err(DispatchError::UnknownOption("--quiet=yes".to_string()))
        );
    }

    #[test]
    fn test_scanning_stops_at_first_positional() {
        let args = argv(&["build", "--bogus"]);
        let result = parsed(parse_options(&args, &table_with_tag()).unwrap());
        assert!(result.options.is_empty());
        assert!(result.consumed.is_empty());
        assert_eq!(result.rest, &args[..]);
    }

    #[test]
    fn test_double_dash_ends_options_and_is_consumed() {
        let args = argv(&["-q", "--", "--tag"]);
        let result = parsed(parse_options(&args, &table_with_tag()).unwrap());
        assert_eq!(result.consumed, &args[..2]);
        assert_eq!(result.rest, &args[2..]);
    }

    #[test]
    fn test_exit_action_short_circuits() {
        let args = argv(&["--help", "--bogus"]);
        assert_eq!(
            parse_options(&args, &table_with_tag()),
            Ok(OptionScan::Exit(ExitRequest {
                action: ExitAction::ShowHelp,
                code: 0
            }))
        );

        let args = argv(&["-q", "--version", "frobnicate"]);
        assert_eq!(
            parse_options(&args, &table_with_tag()),
            Ok(OptionScan::Exit(ExitRequest {
                action: ExitAction::ShowVersion,
                code: 0
            }))
        );
    }

    #[test]
    fn test_scanner_position_points_at_offending_token() {
        let args = argv(&["-q", "--bogus", "build"]);
        let table = table_with_tag();
        let mut scanner = OptionScanner::new(&args, &table);
        assert!(scanner.scan().is_err());
        assert_eq!(scanner.position(), 1);
    }

    #[test]
    fn test_find_tail_exit_only_matches_tail_phase() {
        let table = table_with_tag();
        assert_eq!(
            table.find_tail_exit(&argv(&["--pull", "--version"])),
            Some(ExitRequest {
                action: ExitAction::ShowVersion,
                code: 0
            })
        );
        assert_eq!(table.find_tail_exit(&argv(&["--help"])), None);
        assert_eq!(table.find_tail_exit(&argv(&["-h"])), None);
        assert_eq!(table.find_tail_exit(&argv(&["--version=1"])), None);
    }

    #[test]
    fn test_find_exit_matches_any_phase() {
        let table = table_with_tag();
        let help = Some(ExitRequest {
            action: ExitAction::ShowHelp,
            code: 0,
        });
        assert_eq!(table.find_exit(&argv(&["web", "--help"])), help);
        assert_eq!(table.find_exit(&argv(&["-h"])), help);
        assert_eq!(table.find_exit(&argv(&["--", "-h"])), None);
        assert_eq!(table.find_exit(&argv(&["--tag", "v1"])), None);
    }

    #[test]
    fn test_find_tail_exit_stops_at_double_dash() {
        let table = table_with_tag();
        assert_eq!(
            table.find_tail_exit(&argv(&["myapp", "--", "--version"])),
            None
        );
    }

    #[test]
    fn test_forms_rendering() {
        let table = OptionTable::dapp();
        let forms: Vec<String> = table.iter().map(|d| d.forms()).collect();
        assert_eq!(
            forms,
            vec![
                "    --color WHEN",
                "    --format FORMAT",
                "    --version",
                "-h, --help"
            ]
        );
    }

    #[test]
    fn test_dapp_table_phases() {
        let table = OptionTable::dapp();
        let version = table.find_long("version").unwrap();
        assert_eq!(version.phase, OptionPhase::Tail);
        assert!(version.is_boolean());

        let help = table.find_short('h').unwrap();
        assert_eq!(help.long, Some("help"));
        assert_eq!(help.phase, OptionPhase::Head);

        let color = table.find_long("color").unwrap();
        assert!(!color.is_boolean());
        assert_eq!(color.exit, None);
    }
}

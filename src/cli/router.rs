//! Subcommand routing
//!
//! The router splits argv into three parts: the global-option prefix, the
//! subcommand token, and the suffix owned by the subcommand. The three parts
//! always partition argv exactly; the subcommand token belongs to neither
//! slice.
//!
//! Tail-phase exit options (`--version`) win over every routing outcome:
//! before a result or an error is returned, the tokens the scanner did not
//! consume are searched for one, up to the first `--`. Once the subcommand
//! token turns out to be invalid, head-phase exit options in the suffix
//! (`--help`) count as well, since no subcommand is left to own them.

use crate::cli::options::{ExitRequest, OptionMap, OptionScanner, OptionTable};
use crate::error::DispatchError;
use std::str::FromStr;

/// Outcome of routing one argv
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routing<'a, S> {
    /// An exit-action option was found; no subcommand was validated
    Exit(ExitRequest),
    Routed(RoutingResult<'a, S>),
}

/// Partition of argv into option prefix, subcommand and suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingResult<'a, S> {
    /// Options parsed from the prefix
    pub options: OptionMap,
    /// Matched subcommand, `None` when argv held only options
    pub subcommand: Option<S>,
    argv: &'a [String],
    boundary: usize,
}

impl<'a, S> RoutingResult<'a, S> {
    /// Tokens consumed as global options (including values and `--`)
    pub fn prefix(&self) -> &'a [String] {
        &self.argv[..self.boundary]
    }

    /// The argv token that named the subcommand
    pub fn subcommand_token(&self) -> Option<&'a str> {
        let argv = self.argv;
        self.subcommand
            .as_ref()
            .and_then(|_| argv.get(self.boundary))
            .map(String::as_str)
    }

    /// Everything after the subcommand token, untouched
    pub fn suffix(&self) -> &'a [String] {
        match self.subcommand {
            Some(_) => &self.argv[self.boundary + 1..],
            None => &[],
        }
    }
}

/// Routes argv against an option table and a subcommand type
///
/// The subcommand set is whatever `S::from_str` accepts; matching is exactly
/// one attempt on the first positional token.
#[derive(Debug, Clone, Copy)]
pub struct Router<'t> {
    options: &'t OptionTable,
}

impl<'t> Router<'t> {
    pub fn new(options: &'t OptionTable) -> Self {
        Router { options }
    }

    /// Routes `argv` (program name excluded)
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::UnknownOption` or
    /// `DispatchError::MissingOptionValue` from the option prefix, and
    /// `DispatchError::UnknownSubcommand` when the first positional token
    /// names no subcommand. A tail exit option anywhere before `--` takes
    /// precedence over all of them, and any exit option after an unknown
    /// subcommand token wins over `UnknownSubcommand`.
    pub fn route<'a, S: FromStr>(
        &self,
        argv: &'a [String],
    ) -> Result<Routing<'a, S>, DispatchError> {
        let mut scanner = OptionScanner::new(argv, self.options);
        let scanned = scanner.scan();
        let boundary = scanner.position();
        let unconsumed = &argv[boundary..];

        match scanned {
            Ok(Some(exit)) => return Ok(Routing::Exit(exit)),
            Ok(None) => {}
            Err(err) => {
                return match self.options.find_tail_exit(unconsumed) {
                    Some(exit) => Ok(Routing::Exit(exit)),
                    None => Err(err),
                };
            }
        }

        let Some((candidate, suffix)) = unconsumed.split_first() else {
            log::debug!("no subcommand after {} option token(s)", boundary);
            return Ok(Routing::Routed(RoutingResult {
                options: scanner.into_options(),
                subcommand: None,
                argv,
                boundary,
            }));
        };

        if let Some(exit) = self.options.find_tail_exit(suffix) {
            log::debug!("tail option after '{}' requested {:?}", candidate, exit.action);
            return Ok(Routing::Exit(exit));
        }

        let Ok(subcommand) = candidate.parse::<S>() else {
            if let Some(exit) = self.options.find_exit(suffix) {
                log::debug!("'{}' is no subcommand; {:?} requested", candidate, exit.action);
                return Ok(Routing::Exit(exit));
            }
            return Err(DispatchError::UnknownSubcommand(candidate.clone()));
        };
        log::debug!(
            "routed to '{}' with {} argument(s)",
            candidate,
            suffix.len()
        );

        Ok(Routing::Routed(RoutingResult {
            options: scanner.into_options(),
            subcommand: Some(subcommand),
            argv,
            boundary,
        }))
    }
}

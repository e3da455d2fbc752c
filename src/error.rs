//! Error types for dapp
//!
//! Routing failures live in [`DispatchError`], configuration failures in
//! [`ConfigError`], and everything surfaced by the entry point is folded
//! into [`DappError`].

use std::path::PathBuf;

/// Errors detected while splitting argv into options, subcommand and suffix
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Token looks like an option but matches no declared definition
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    /// Value-taking option appeared as the last token
    #[error("option '{0}' requires a value")]
    MissingOptionValue(String),

    /// First positional token is not a recognized subcommand
    #[error("unknown subcommand '{0}'")]
    UnknownSubcommand(String),

    /// Argv was exhausted without a positional token
    #[error("no subcommand given")]
    NoSubcommandGiven,

    /// Argument is not valid UTF-8 (shown lossily)
    #[error("argument '{0}' is not valid UTF-8")]
    InvalidUnicode(String),
}

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has unexpected keys
    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level error type for dapp
#[derive(Debug, thiserror::Error)]
pub enum DappError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A global option carried a value outside its accepted set
    #[error("invalid value '{value}' for '--{option}' (expected one of: {expected})")]
    InvalidSetting {
        option: String,
        value: String,
        expected: String,
    },

    /// The subcommand's own parser rejected its arguments (or rendered help)
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_errors_name_the_token() {
        assert_eq!(
            DispatchError::UnknownSubcommand("frobnicate".to_string()).to_string(),
            "unknown subcommand 'frobnicate'"
        );
        assert_eq!(
            DispatchError::UnknownOption("--bogus".to_string()).to_string(),
            "unknown option '--bogus'"
        );
        assert_eq!(
            DispatchError::MissingOptionValue("--tag".to_string()).to_string(),
            "option '--tag' requires a value"
        );
    }

    #[test]
    fn test_dispatch_error_is_transparent_in_dapp_error() {
        let err: DappError = DispatchError::NoSubcommandGiven.into();
        assert_eq!(err.to_string(), "no subcommand given");
        assert!(matches!(err, DappError::Dispatch(_)));
    }

    #[test]
    fn test_config_error_contains_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/dapp.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let dapp_err: DappError = err.into();
        let message = dapp_err.to_string();
        assert!(message.contains("/etc/dapp.toml"));
        assert!(message.starts_with("Configuration error"));
    }

    #[test]
    fn test_invalid_setting_lists_expected_values() {
        let err = DappError::InvalidSetting {
            option: "color".to_string(),
            value: "purple".to_string(),
            expected: "auto, always, never".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("'purple'"));
        assert!(message.contains("--color"));
        assert!(message.contains("auto, always, never"));
    }
}

//! Parsing of the optional dapp.toml configuration file
//!
//! The file only carries defaults for global settings; command-line options
//! always take precedence.

use crate::error::ConfigError;
use crate::types::{ColorOption, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "dapp.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "DAPP_CONFIG";

/// Main configuration struct for dapp.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Defaults for global settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub color: Option<ColorOption>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Locate and load the configuration for this process
    ///
    /// `$DAPP_CONFIG` must name an existing file when set; otherwise
    /// `dapp.toml` in `dir` is used if present, else the defaults.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(explicit) if !explicit.is_empty() => Self::load(PathBuf::from(explicit)),
            _ => Self::discover_in(dir),
        }
    }

    /// Like [`Config::discover`] but ignores the environment
    pub fn discover_in(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            log::debug!("loading configuration from {}", path.display());
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }
}

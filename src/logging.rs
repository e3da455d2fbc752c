//! Logger setup
//!
//! Diagnostics go through the `log` facade to stderr. The filter is read from
//! `DAPP_LOG` using `env_logger` syntax (`debug`, `dapp::cli=trace`, ...).

use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "DAPP_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Installs the global logger; repeated calls are ignored
pub fn init() {
    let _ = builder().try_init();
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, DEFAULT_FILTER));
    builder
        .target(Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false);
    builder
}

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The engines only emit events; installing a subscriber is left to the host.
//! This helper is for hosts (and tests) that have none of their own.
//!
//! Priority for determining the filter:
//! 1. the `level` argument (if provided)
//! 2. the `TASKGRAPH_LOG` environment variable: a bare level name (`warning`
//!    is accepted for `warn`) or any `EnvFilter` directive
//! 3. default to `info`

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, TaskGraphError};

pub const LOG_ENV_VAR: &str = "TASKGRAPH_LOG";

/// Install a global fmt subscriber writing to stderr.
///
/// Calling this more than once is harmless: later calls return an error that
/// callers are free to ignore.
pub fn init_logging(level: Option<Level>) -> Result<()> {
    let filter = match level {
        Some(lvl) => level_filter(lvl),
        None => filter_from_env_value(std::env::var(LOG_ENV_VAR).ok().as_deref()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| TaskGraphError::Logging(err.to_string()))
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::new(level.as_str().to_lowercase())
}

fn filter_from_env_value(raw: Option<&str>) -> EnvFilter {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return EnvFilter::new("info");
    };
    match parse_level_str(raw) {
        Some(level) => level_filter(level),
        None => EnvFilter::try_new(raw).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Parse a user-facing level name, accepting `warning` as an alias.
fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

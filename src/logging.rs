// src/logging.rs

//! Logging setup for `sitepipe` using `tracing` + `tracing-subscriber`.
//!
//! Filter resolution:
//! 1. `--log-level` CLI flag (applies to every target)
//! 2. `SITEPIPE_LOG`, any `EnvFilter` directive string
//!    (e.g. `"debug"` or `"info,sitepipe::exec=trace"`)
//! 3. `info`
//!
//! Logs go to STDERR so that `--json` output on stdout stays machine-readable.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;
use crate::engine::HostEnv;

/// Environment variable consulted when no `--log-level` flag is given.
pub const LOG_ENV_VAR: &str = "SITEPIPE_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, env: &HostEnv) -> Result<()> {
    let directive = resolve_directive(cli_level, env);
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow!("invalid log filter '{directive}': {e}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

/// Effective filter directive. A malformed `SITEPIPE_LOG` falls back to the
/// default rather than aborting the run.
pub fn resolve_directive(cli_level: Option<LogLevel>, env: &HostEnv) -> String {
    if let Some(level) = cli_level {
        return level.as_directive().to_string();
    }
    env.get(LOG_ENV_VAR)
        .map(str::trim)
        .filter(|d| EnvFilter::try_new(d).is_ok())
        .unwrap_or(DEFAULT_DIRECTIVE)
        .to_string()
}

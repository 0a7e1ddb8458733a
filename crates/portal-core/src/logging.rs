//! Log file setup.
//!
//! Events go to `$PORTAL_HOME/logs/portal.log`. The terminal is never written
//! to, since the TUI owns it.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogConfig, paths};

/// Env var holding a filter directive; overrides `log.level`.
pub const LOG_ENV: &str = "PORTAL_LOG";

pub const LOG_FILE_NAME: &str = "portal.log";

/// Installs the global subscriber writing to the default log directory.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes pending lines.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber is
/// already installed.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), config)
}

/// Installs the global subscriber writing into `dir`.
///
/// # Errors
/// Returns an error if `dir` cannot be created or a subscriber is already installed.
pub fn init_in(dir: &Path, config: &LogConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter_for(config))
        .with(fmt_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}

fn filter_for(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

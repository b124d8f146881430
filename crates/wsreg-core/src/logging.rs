//! File logging.
//!
//! The TUI owns the terminal, so logs go to a daily rolling file under
//! `${WSREG_HOME}/logs` instead of stderr.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Config, paths};

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "WSREG_LOG";

const LOG_FILE_PREFIX: &str = "wsreg.log";
const FALLBACK_DIRECTIVE: &str = "info";

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered lines are lost.
pub fn init_file_logging(config: &Config) -> Result<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let directive = directive(std::env::var(LOG_ENV).ok(), &config.log_level);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}

fn directive(from_env: Option<String>, configured: &str) -> String {
    from_env
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .or_else(|| Some(configured.trim()).filter(|d| !d.is_empty()))
        .unwrap_or(FALLBACK_DIRECTIVE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_directive_wins() {
        assert_eq!(directive(Some("wsreg_core=trace".into()), "info"), "wsreg_core=trace");
    }

    #[test]
    fn test_blank_values_fall_back() {
        assert_eq!(directive(Some("  ".into()), "warn"), "warn");
        assert_eq!(directive(None, ""), "info");
    }
}

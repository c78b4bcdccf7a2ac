//! Tracing subscriber setup

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Build the log filter. `RUST_LOG` directives, when set, replace the
/// configured level entirely.
pub fn env_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter> {
    match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => {
            EnvFilter::try_new(directives).context("Invalid RUST_LOG directives")
        }
        None => EnvFilter::try_new(format!("noshow_predictor={}", level))
            .context("Invalid logging.level"),
    }
}

/// Install the global subscriber. Logs go to stderr; stdout carries the
/// result panel.
pub fn init_tracing(logging: &LoggingConfig, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = env_filter(rust_log.as_deref(), level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::prelude::*;

    fn debug_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "noshow_predictor::pipeline", Level::DEBUG)
        })
    }

    #[test]
    fn test_configured_level_without_rust_log() {
        assert!(!debug_enabled(env_filter(None, "info").unwrap()));
        assert!(debug_enabled(env_filter(None, "debug").unwrap()));
    }

    #[test]
    fn test_rust_log_overrides_configured_level() {
        let raised = env_filter(Some("noshow_predictor=debug"), "info").unwrap();
        assert!(debug_enabled(raised));

        let lowered = env_filter(Some("noshow_predictor=warn"), "trace").unwrap();
        assert!(!debug_enabled(lowered));
    }

    #[test]
    fn test_blank_rust_log_uses_configured_level() {
        assert!(debug_enabled(env_filter(Some("  "), "debug").unwrap()));
    }
}

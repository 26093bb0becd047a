//! Tracing subscriber setup
//!
//! The library only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_logging`] once.

use tracing_subscriber::EnvFilter;

use crate::config::{LOG_ENV_VAR, LogFormat, LoggingConfig};
use crate::error::LoggingError;

/// Filter directive in effect: `REQ_BUMP_LOG` when set, else the configured level
pub fn filter_directive(config: &LoggingConfig) -> String {
    directive_with_env(std::env::var(LOG_ENV_VAR).ok(), config)
}

fn directive_with_env(env: Option<String>, config: &LoggingConfig) -> String {
    env.filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.level.clone())
}

/// Build the `EnvFilter` for a directive
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
        filter: directive.to_string(),
        message: e.to_string(),
    })
}

/// Install the global tracing subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let directive = filter_directive(config);
    let filter = build_filter(&directive)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    let result = match config.format {
        LogFormat::Text => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| LoggingError::Install {
        message: e.to_string(),
    })?;

    tracing::debug!("Logging initialized with filter '{}'", directive);
    Ok(())
}

//! Tracing subscriber setup.

use crate::config::LogFormat;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The default filter directive does not parse.
    #[error("invalid log filter '{directive}': {reason}")]
    Filter {
        /// Directive taken from configuration.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (for example
/// `"info"` or `"taskgate=debug,tower_http=info"`) is used.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the directive is invalid or a subscriber
/// has already been installed.
pub fn init_tracing(default_directive: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|err| TelemetryError::Filter {
            directive: default_directive.to_owned(),
            reason: err.to_string(),
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| TelemetryError::Install(err.to_string()))
}

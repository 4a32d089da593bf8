//! Tracing subscriber bootstrap for binaries and test harnesses.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "carepath=info";

/// Errors returned while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive does not parse.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("tracing already initialised: {0}")]
    AlreadyInitialised(String),
}

/// Installs a formatted subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the fallback directive is
/// malformed and [`TelemetryError::AlreadyInitialised`] when a subscriber is
/// already installed.
pub fn init_tracing(default_directive: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|err| {
            TelemetryError::InvalidFilter {
                directive: default_directive.to_owned(),
                message: err.to_string(),
            }
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInitialised(err.to_string()))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "carepath tracing initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_reported() {
        let _first = init_tracing(DEFAULT_LOG_FILTER);
        let second = init_tracing(DEFAULT_LOG_FILTER);
        assert!(matches!(second, Err(TelemetryError::AlreadyInitialised(_))));
    }
}

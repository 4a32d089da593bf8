//! Runtime configuration for the care coordination services.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration:
//!
//! ```
//! use carepath::config::CarePathConfig;
//!
//! let config = CarePathConfig::from_json_str("{}").expect("defaults apply");
//! assert_eq!(config.redirect.review_after_hops, 3);
//! ```

use crate::referral::domain::RedirectPolicy;
use crate::resilience::RetryPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration consumed by the referral and task services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarePathConfig {
    /// Redirect chain escalation policy.
    pub redirect: RedirectPolicy,
    /// Retry policy for infrastructure failures.
    pub retry: RetryPolicy,
}

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A retry policy must allow at least one attempt.
    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,
}

impl CarePathConfig {
    /// Parses configuration from a JSON document, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::ZeroAttempts`] when retries are configured with zero
    /// attempts.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        if config.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = CarePathConfig::from_json_str(r#"{"redirect": {"review_after_hops": 5}}"#)
            .expect("configuration should parse");

        assert_eq!(config.redirect.review_after_hops, 5);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let result = CarePathConfig::from_json_str(r#"{"retry": {"max_attempts": 0}}"#);
        assert!(matches!(result, Err(ConfigError::ZeroAttempts)));
    }

    #[test]
    fn malformed_document_is_rejected() {
        let result = CarePathConfig::from_json_str("{redirect");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

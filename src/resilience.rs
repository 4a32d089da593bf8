//! Single-retry policy for infrastructure failures at the service boundary.
//!
//! Business-rule failures pass straight through. Transient failures are
//! retried after a short backoff; if the final attempt still fails the caller
//! receives [`RetryError::Exhausted`], which services surface as
//! `ServiceUnavailable`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Retry configuration for repository and directory calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first call.
    pub max_attempts: u32,
    /// Base delay before each retry, multiplied by the attempt number.
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff_ms: 50,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempts and base backoff.
    #[must_use]
    pub const fn new(max_attempts: u32, backoff_ms: u64) -> Self {
        Self {
            max_attempts,
            backoff_ms,
        }
    }

    /// Policy that never retries.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(1, 0)
    }

    /// Returns the delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms).saturating_mul(attempt)
    }
}

/// Classifies errors that may succeed when retried.
pub trait Transient {
    /// Returns whether the failure is an infrastructure fault.
    fn is_transient(&self) -> bool;
}

/// Outcome of a call that did not succeed.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The call failed with a non-transient (business) error.
    Rejected(E),
    /// Every attempt failed with a transient error.
    Exhausted {
        /// Logical operation name.
        operation: &'static str,
        /// Attempts made.
        attempts: u32,
        /// Last error observed.
        source: E,
    },
}

/// Runs `call`, retrying transient failures according to `policy`.
///
/// # Errors
///
/// Returns [`RetryError::Rejected`] for non-transient errors and
/// [`RetryError::Exhausted`] once attempts run out.
pub async fn with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    operation: &'static str,
    mut call: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(RetryError::Rejected(err)),
            Err(err) if attempt >= max_attempts => {
                tracing::error!(
                    operation,
                    attempts = attempt,
                    error = %err,
                    "giving up after transient failures"
                );
                return Err(RetryError::Exhausted {
                    operation,
                    attempts: attempt,
                    source: err,
                });
            }
            Err(err) => {
                tracing::warn!(operation, attempt, error = %err, "transient failure, retrying");
                tokio::time::sleep(policy.backoff(attempt)).await;
                attempt += 1;
            }
        }
    }
}

//! # Retry budget and reset policy.
//!
//! [`RetryPolicy`] bounds the number of failures the consumer tolerates over
//! its lifetime and decides whether that count ever goes back to zero.
//!
//! ```text
//! RetryReset::Never        → count and delay persist across reconnects (default)
//! RetryReset::OnListening  → a session reaching Listening restores the full budget
//! ```

use std::{fmt, str::FromStr, time::Duration};

use crate::error::ConfigError;
use crate::policies::BackoffPolicy;

/// When the retry count and backoff delay return to their baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetryReset {
    /// Never: the count is monotonic for the whole process lifetime.
    #[default]
    Never,
    /// Every successfully opened session resets the count.
    OnListening,
}

impl FromStr for RetryReset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(RetryReset::Never),
            "on-listening" | "on_listening" => Ok(RetryReset::OnListening),
            other => Err(ConfigError::InvalidResetPolicy {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RetryReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReset::Never => f.write_str("never"),
            RetryReset::OnListening => f.write_str("on-listening"),
        }
    }
}

/// Retry budget of the consumption loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Failures tolerated before the loop terminates.
    pub max_retries: u32,
    /// Delay schedule between connect attempts.
    pub backoff: BackoffPolicy,
    /// Reset behaviour after a successful reconnect.
    pub reset: RetryReset,
}

impl Default for RetryPolicy {
    /// `max_retries = 5`, default backoff, `RetryReset::Never`.
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: BackoffPolicy::default(),
            reset: RetryReset::Never,
        }
    }
}

impl RetryPolicy {
    /// Convenience constructor for the common knobs.
    pub fn new(max_retries: u32, first: Duration, max: Duration) -> Self {
        Self {
            max_retries,
            backoff: BackoffPolicy {
                first,
                max,
                ..BackoffPolicy::default()
            },
            reset: RetryReset::Never,
        }
    }
}

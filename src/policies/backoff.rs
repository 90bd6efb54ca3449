//! # Reconnect backoff policy.
//!
//! [`BackoffPolicy`] maps the number of failures recorded so far to the delay
//! slept before the next connect attempt:
//! - [`BackoffPolicy::first`] the delay after the first failure;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the ceiling.
//!
//! The delay after failure `n` (1-based) is `first × factor^(n-1)`, clamped to `max`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use log_message_processor::BackoffPolicy;
//!
//! let backoff = BackoffPolicy::default();
//!
//! assert_eq!(backoff.delay_for(1), Duration::from_secs(5));
//! assert_eq!(backoff.delay_for(2), Duration::from_secs(10));
//! assert_eq!(backoff.delay_for(5), Duration::from_secs(60));
//! ```

use std::time::Duration;

/// Reconnect backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first failure.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` keeps delays non-decreasing).
    pub factor: f64,
}

impl Default for BackoffPolicy {
    /// Returns `first = 5s`, `factor = 2.0`, `max = 60s`.
    fn default() -> Self {
        Self {
            first: Duration::from_secs(5),
            max: Duration::from_secs(60),
            factor: 2.0,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay to sleep after the `failures`-th recorded failure.
    ///
    /// `failures == 0` is treated like the first failure.
    /// Overflowing or non-finite intermediate values clamp to [`BackoffPolicy::max`].
    pub fn delay_for(&self, failures: u32) -> Duration {
        let exp = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        if !secs.is_finite() || secs < 0.0 || secs > self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}

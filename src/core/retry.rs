//! # Retry bookkeeping for the consumption loop.
//!
//! [`RetryState`] counts failures (connect failures and lost sessions alike)
//! and turns each one into a decision: wait and reconnect, or give up.
//!
//! ```text
//! failure ─► failures += 1 ─► failures >= max_retries ? Exhausted
//!                                                     : Backoff(delay_for(failures))
//! ```
//!
//! The count persists across reconnects unless the policy resets it once a
//! session reaches Listening.

use std::time::Duration;

use crate::policies::{RetryPolicy, RetryReset};

/// What the loop does after a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RetryDecision {
    /// Sleep, then reconnect.
    Backoff(Duration),
    /// Stop for good.
    Exhausted,
}

#[derive(Clone, Debug)]
pub(crate) struct RetryState {
    policy: RetryPolicy,
    failures: u32,
}

impl RetryState {
    pub(crate) fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    pub(crate) fn failures(&self) -> u32 {
        self.failures
    }

    pub(crate) fn max_retries(&self) -> u32 {
        self.policy.max_retries
    }

    /// 1-based number of the next connect attempt.
    pub(crate) fn attempt(&self) -> u32 {
        self.failures.saturating_add(1)
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.failures >= self.policy.max_retries
    }

    pub(crate) fn record_failure(&mut self) -> RetryDecision {
        self.failures = self.failures.saturating_add(1);
        if self.is_exhausted() {
            RetryDecision::Exhausted
        } else {
            RetryDecision::Backoff(self.policy.backoff.delay_for(self.failures))
        }
    }

    /// Applies the reset policy after a session reached Listening.
    ///
    /// Returns `true` if a non-zero count was cleared.
    pub(crate) fn on_listening(&mut self) -> bool {
        if self.policy.reset == RetryReset::OnListening && self.failures > 0 {
            self.failures = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> RetryDecision {
        RetryDecision::Backoff(Duration::from_secs(s))
    }

    #[test]
    fn delays_double_until_cap_then_budget_runs_out() {
        let mut st = RetryState::new(RetryPolicy::new(
            7,
            Duration::from_secs(5),
            Duration::from_secs(60),
        ));
        let got: Vec<_> = (0..7).map(|_| st.record_failure()).collect();
        assert_eq!(
            got,
            vec![
                secs(5),
                secs(10),
                secs(20),
                secs(40),
                secs(60),
                secs(60),
                RetryDecision::Exhausted
            ]
        );
        assert_eq!(st.failures(), 7);
    }

    #[test]
    fn default_budget_allows_four_waits() {
        let mut st = RetryState::new(RetryPolicy::default());
        for _ in 0..4 {
            assert!(matches!(st.record_failure(), RetryDecision::Backoff(_)));
        }
        assert_eq!(st.record_failure(), RetryDecision::Exhausted);
        assert!(st.is_exhausted());
    }

    #[test]
    fn zero_budget_is_exhausted_from_the_start() {
        let st = RetryState::new(RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        });
        assert!(st.is_exhausted());
        assert_eq!(st.attempt(), 1);
    }

    #[test]
    fn count_persists_unless_reset_on_listening() {
        let mut never = RetryState::new(RetryPolicy::default());
        never.record_failure();
        assert!(!never.on_listening());
        assert_eq!(never.failures(), 1);

        let mut reset = RetryState::new(RetryPolicy {
            reset: RetryReset::OnListening,
            ..RetryPolicy::default()
        });
        assert!(!reset.on_listening());
        reset.record_failure();
        reset.record_failure();
        assert!(reset.on_listening());
        assert_eq!(reset.failures(), 0);
        assert_eq!(reset.record_failure(), secs(5));
    }
}

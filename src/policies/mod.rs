//! Retry and backoff policies.
//!
//! This module groups the knobs that control **whether** the consumer keeps
//! reconnecting and **how long** it waits between attempts.
//!
//! ## Contents
//! - [`RetryPolicy`] failure budget and reset behaviour
//! - [`BackoffPolicy`] how reconnect delays evolve (first / factor / max)
//! - [`RetryReset`] whether a healthy session restores the budget
//!
//! ## Quick wiring
//! ```text
//! Config { retry: RetryPolicy { max_retries, backoff, reset }, .. }
//!      └─► core::retry::RetryState uses:
//!           - max_retries to decide ReconnectWait vs Terminated
//!           - backoff.delay_for(failures) to schedule the next connect
//!           - reset when a session reaches Listening
//! ```
//!
//! ## Defaults
//! - `max_retries = 5`
//! - `BackoffPolicy::default()` → first=5s, factor=2.0, max=60s.
//! - `RetryReset::Never`.

mod backoff;
mod retry;

pub use backoff::BackoffPolicy;
pub use retry::{RetryPolicy, RetryReset};

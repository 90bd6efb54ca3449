//! # Lifecycle events emitted by the consumer.
//!
//! [`EventKind`] classifies what happened:
//! - **Connection events**: connect attempts, subscription, loss
//! - **Message events**: per-message failures that were absorbed
//! - **Retry events**: backoff scheduling, budget reset, exhaustion
//! - **Shutdown events**: signal observed, loop stopped
//!
//! [`Event`] carries the metadata (timestamp, attempt, delay, reason, subject).
//!
//! ## Ordering
//! Every event gets a process-wide monotonically increasing `seq`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use log_message_processor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::BackoffScheduled)
//!     .with_attempt(2)
//!     .with_delay(Duration::from_secs(10))
//!     .with_reason("connection closed");
//!
//! assert_eq!(ev.kind, EventKind::BackoffScheduled);
//! assert_eq!(ev.delay(), Some(Duration::from_secs(10)));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of consumer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Connection ===
    /// A connect attempt is starting.
    ///
    /// Sets `subject` (endpoint), `attempt` (1-based), `max_attempts`.
    Connecting,

    /// Connection is up and the subscription request was accepted.
    ///
    /// Sets `subject` (endpoint).
    Connected,

    /// The server confirmed the channel subscription.
    ///
    /// Sets `subject` (channel).
    Subscribed,

    /// A connect attempt failed.
    ///
    /// Sets `subject` (endpoint), `attempt`, `reason`.
    ConnectFailed,

    /// A timeout-class error was seen while listening; polling continues.
    ///
    /// Sets `reason`.
    TransientError,

    /// A connection-class error ended the session.
    ///
    /// Sets `reason`.
    ConnectionLost,

    // === Messages ===
    /// Payload could not be decoded; the processor receives the error text.
    ///
    /// Sets `reason`.
    DecodeFailed,

    /// The message carried a `zipkinSpan` that could not be interpreted.
    ///
    /// Sets `reason`.
    TraceContextInvalid,

    /// Span delivery to the collector failed.
    ///
    /// Sets `reason`, `subject` (collector URL).
    TraceReportFailed,

    /// The processor returned an error.
    ///
    /// Sets `reason`.
    ProcessorFailed,

    /// The processor panicked.
    ///
    /// Sets `reason` (panic message).
    ProcessorPanicked,

    // === Retry ===
    /// The next connect attempt was scheduled.
    ///
    /// Sets `attempt` (failures so far), `delay_ms`, `reason`.
    BackoffScheduled,

    /// The retry budget was restored after reaching Listening.
    RetryReset,

    /// The retry budget is spent; the loop terminates.
    ///
    /// Sets `attempt` (failures recorded).
    RetriesExhausted,

    // === Shutdown ===
    /// A termination signal was observed.
    ShutdownRequested,

    /// The loop exited because it was cancelled.
    Stopped,
}

/// Consumer event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Monotonic sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Attempt or failure count, depending on the kind.
    pub attempt: Option<u32>,
    /// Upper bound for `attempt`, when meaningful.
    pub max_attempts: Option<u32>,
    /// Backoff delay in milliseconds.
    pub delay_ms: Option<u64>,
    /// Human-readable reason (error text, panic message).
    pub reason: Option<Arc<str>>,
    /// What the event is about: endpoint, channel or collector.
    pub subject: Option<Arc<str>>,
}

impl Event {
    /// Creates an event of the given kind with the current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            attempt: None,
            max_attempts: None,
            delay_ms: None,
            reason: None,
            subject: None,
        }
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn with_subject(mut self, subject: impl Into<Arc<str>>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    #[inline]
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Returns the attached delay, if any.
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }
}

//! # LogWriter: structured log output for lifecycle events
//!
//! Maps every [`Event`] to a `tracing` record at a fitting level. This is the
//! consumer's primary observability surface; the binary always installs it.
//!
//! ## Example output
//! ```text
//! INFO  connecting endpoint="localhost:6379" attempt=1 max=5
//! INFO  connected endpoint="localhost:6379"
//! INFO  subscribed channel="log_channel"
//! ERROR failed to parse message reason="payload is not valid json: expected value at line 1 column 1"
//! ERROR connection lost reason="connection closed"
//! INFO  retrying after backoff delay_ms=5000 failures=1
//! ERROR max retries reached, giving up failures=5
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber backed by `tracing`.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let subject = e.subject.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::Connecting => {
                info!(endpoint = subject, attempt = ?e.attempt, max = ?e.max_attempts, "connecting");
            }
            EventKind::Connected => info!(endpoint = subject, "connected"),
            EventKind::Subscribed => info!(channel = subject, "subscribed"),
            EventKind::ConnectFailed => {
                error!(endpoint = subject, attempt = ?e.attempt, reason, "failed to connect");
            }
            EventKind::TransientError => {
                warn!(reason, "socket timeout, continuing to listen");
            }
            EventKind::ConnectionLost => error!(reason, "connection lost"),
            EventKind::DecodeFailed => error!(reason, "failed to parse message"),
            EventKind::TraceContextInvalid => {
                warn!(reason, "ignoring unusable tracing context");
            }
            EventKind::TraceReportFailed => {
                error!(collector = subject, reason, "failed to send span to collector");
            }
            EventKind::ProcessorFailed => error!(reason, "message processing failed"),
            EventKind::ProcessorPanicked => error!(reason, "message processor panicked"),
            EventKind::BackoffScheduled => {
                info!(delay_ms = ?e.delay_ms, failures = ?e.attempt, reason, "retrying after backoff");
            }
            EventKind::RetryReset => debug!("retry budget reset"),
            EventKind::RetriesExhausted => {
                error!(failures = ?e.attempt, "max retries reached, giving up");
            }
            EventKind::ShutdownRequested => info!("shutdown requested"),
            EventKind::Stopped => info!("consumer stopped"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

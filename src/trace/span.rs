//! # Completed spans.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::context::{TraceContext, TraceId};

/// Server-receive annotation value.
pub const SERVER_RECV: &str = "sr";
/// Server-send annotation value.
pub const SERVER_SEND: &str = "ss";

/// One timed unit of work, ready to be reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub trace_id: TraceId,
    pub id: u64,
    pub parent_id: Option<u64>,
    pub name: String,
    pub service: String,
    /// Start, microseconds since the Unix epoch.
    pub timestamp_us: i64,
    /// Duration in microseconds (at least 1).
    pub duration_us: i64,
    pub debug: bool,
}

impl Span {
    /// Builds the span of a finished processing scope.
    pub fn finished(
        ctx: &TraceContext,
        name: &str,
        service: &str,
        started: SystemTime,
        elapsed: Duration,
    ) -> Self {
        let timestamp_us = started
            .duration_since(UNIX_EPOCH)
            .map(micros)
            .unwrap_or(0);

        Self {
            trace_id: ctx.trace_id,
            id: ctx.span_id,
            parent_id: Some(ctx.parent_id),
            name: name.to_string(),
            service: service.to_string(),
            timestamp_us,
            duration_us: micros(elapsed).max(1),
            debug: false,
        }
    }

    /// Timestamp of the server-send annotation.
    pub fn end_us(&self) -> i64 {
        self.timestamp_us.saturating_add(self.duration_us)
    }
}

fn micros(d: Duration) -> i64 {
    i64::try_from(d.as_micros()).unwrap_or(i64::MAX)
}

//! # Processing spans.
//!
//! [`TraceEmitter::in_span`] times a unit of work and reports it once the
//! work has finished. The work always completes before delivery is
//! attempted, and delivery is bounded by the emitter's timeout regardless of
//! the reporter implementation.
//!
//! Spans are recorded at a 100% rate: the upstream sampling flag does not
//! suppress the report.
//!
//! ```text
//! in_span(ctx, work)
//!   ├─► start clock
//!   ├─► work.await                       (processor runs here)
//!   └─► timeout(catch_unwind(report([span]))) ─► Ok | ReportError
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use futures::FutureExt;
use tokio::time;

use super::context::TraceContext;
use super::reporter::SpanReporter;
use super::span::Span;
use crate::error::ReportError;
use crate::subscribers::panic_message;

/// Service name recorded on every span.
pub const SERVICE_NAME: &str = "log-message-processor";
/// Name of the processing span.
pub const SPAN_NAME: &str = "save_log";

/// Wraps work in a span and reports it.
#[derive(Clone)]
pub struct TraceEmitter {
    reporter: Arc<dyn SpanReporter>,
    timeout: Duration,
}

impl TraceEmitter {
    pub fn new(reporter: Arc<dyn SpanReporter>, timeout: Duration) -> Self {
        Self { reporter, timeout }
    }

    /// Collector endpoint, for logs.
    pub fn collector(&self) -> &str {
        self.reporter.endpoint()
    }

    /// Runs `work` inside a span for `ctx`, then reports the span.
    ///
    /// The returned error only describes delivery; `work` has completed either way.
    pub async fn in_span<F>(&self, ctx: &TraceContext, work: F) -> Result<(), ReportError>
    where
        F: Future<Output = ()>,
    {
        let started = SystemTime::now();
        let clock = Instant::now();
        work.await;

        let span = Span::finished(ctx, SPAN_NAME, SERVICE_NAME, started, clock.elapsed());
        let report = AssertUnwindSafe(self.reporter.report(std::slice::from_ref(&span)));
        match time::timeout(self.timeout, report.catch_unwind()).await {
            Ok(Ok(res)) => res,
            Ok(Err(panic_err)) => Err(ReportError::Panicked {
                reason: panic_message(&*panic_err),
            }),
            Err(_elapsed) => Err(ReportError::Timeout {
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::context::TraceId;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct Recording(Mutex<Vec<Span>>);

    #[async_trait]
    impl SpanReporter for Recording {
        async fn report(&self, spans: &[Span]) -> Result<(), ReportError> {
            self.0.lock().unwrap().extend_from_slice(spans);
            Ok(())
        }
        fn endpoint(&self) -> &str {
            "memory"
        }
    }

    struct Hanging;

    #[async_trait]
    impl SpanReporter for Hanging {
        async fn report(&self, _spans: &[Span]) -> Result<(), ReportError> {
            std::future::pending::<()>().await;
            Ok(())
        }
        fn endpoint(&self) -> &str {
            "black-hole"
        }
    }

    fn ctx(sampled: Option<bool>) -> TraceContext {
        TraceContext {
            trace_id: TraceId { high: None, low: 10 },
            span_id: 11,
            parent_id: 12,
            sampled,
        }
    }

    #[tokio::test]
    async fn reports_one_span_after_work() {
        let rec = Arc::new(Recording::default());
        let emitter = TraceEmitter::new(rec.clone(), Duration::from_secs(5));

        emitter.in_span(&ctx(Some(true)), async {}).await.unwrap();

        let spans = rec.0.lock().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, SPAN_NAME);
        assert_eq!(spans[0].service, SERVICE_NAME);
        assert_eq!(spans[0].id, 11);
        assert_eq!(spans[0].parent_id, Some(12));
    }

    #[tokio::test]
    async fn upstream_not_sampled_still_reports() {
        let rec = Arc::new(Recording::default());
        let emitter = TraceEmitter::new(rec.clone(), Duration::from_secs(5));
        let ran = AtomicBool::new(false);

        emitter
            .in_span(&ctx(Some(false)), async {
                ran.store(true, Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(rec.0.lock().unwrap().len(), 1);
    }

    struct Exploding;

    #[async_trait]
    impl SpanReporter for Exploding {
        async fn report(&self, _spans: &[Span]) -> Result<(), ReportError> {
            panic!("collector client bug");
        }
        fn endpoint(&self) -> &str {
            "exploding"
        }
    }

    #[tokio::test]
    async fn panicking_reporter_becomes_an_error() {
        let emitter = TraceEmitter::new(Arc::new(Exploding), Duration::from_secs(5));
        let ran = AtomicBool::new(false);

        let err = emitter
            .in_span(&ctx(Some(true)), async {
                ran.store(true, Ordering::SeqCst);
            })
            .await
            .unwrap_err();

        assert!(ran.load(Ordering::SeqCst));
        match err {
            ReportError::Panicked { reason } => assert_eq!(reason, "collector client bug"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_collector_is_cut_off_after_timeout() {
        let emitter = TraceEmitter::new(Arc::new(Hanging), Duration::from_secs(5));
        let ran = AtomicBool::new(false);
        let before = time::Instant::now();

        let err = emitter
            .in_span(&ctx(None), async {
                ran.store(true, Ordering::SeqCst);
            })
            .await
            .unwrap_err();

        assert!(ran.load(Ordering::SeqCst));
        assert!(matches!(err, ReportError::Timeout { .. }));
        assert!(before.elapsed() >= Duration::from_secs(5));
        assert_eq!(emitter.collector(), "black-hole");
    }
}

//! # Span reporters.
//!
//! [`SpanReporter`] is the seam between the trace emitter and the collector.
//! [`HttpReporter`] POSTs Thrift-encoded span lists with a bounded timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::span::Span;
use super::thrift::encode_span_list;
use crate::error::ReportError;

/// Content type of Thrift-encoded span lists.
pub const THRIFT_CONTENT_TYPE: &str = "application/x-thrift";

/// Delivers finished spans to a collector.
#[async_trait]
pub trait SpanReporter: Send + Sync + 'static {
    /// Sends the spans; one call per processed message.
    async fn report(&self, spans: &[Span]) -> Result<(), ReportError>;

    /// Where spans go (for logs).
    fn endpoint(&self) -> &str;
}

/// HTTP collector client.
#[derive(Clone, Debug)]
pub struct HttpReporter {
    client: reqwest::Client,
    url: String,
}

impl HttpReporter {
    /// Creates a reporter whose requests time out after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ReportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SpanReporter for HttpReporter {
    async fn report(&self, spans: &[Span]) -> Result<(), ReportError> {
        let resp = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, THRIFT_CONTENT_TYPE)
            .body(encode_span_list(spans))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReportError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::context::TraceId;

    #[tokio::test]
    async fn unreachable_collector_is_an_error_not_a_panic() {
        // Port 9 (discard) on loopback is closed in test environments.
        let reporter =
            HttpReporter::new("http://127.0.0.1:9/api/v1/spans", Duration::from_secs(5)).unwrap();
        let span = Span {
            trace_id: TraceId { high: None, low: 1 },
            id: 2,
            parent_id: Some(3),
            name: "save_log".into(),
            service: "svc".into(),
            timestamp_us: 0,
            duration_us: 1,
            debug: false,
        };

        let err = reporter.report(&[span]).await.unwrap_err();
        assert!(matches!(err, ReportError::Http(_) | ReportError::Timeout { .. }));
        assert_eq!(reporter.endpoint(), "http://127.0.0.1:9/api/v1/spans");
    }
}

//! # Message processors.
//!
//! The [`Processor`] trait is the consumer's only extension point for
//! business logic. It receives every message exactly once, decoded or not.
//!
//! - [`ProcessorFn`] wraps a closure that creates a fresh future per message.
//! - [`LogProcessor`] is the default: it simulates variable-latency work and
//!   logs the message.
//!
//! ## Contract
//! Errors and panics are caught by the caller, logged, and the consumer moves
//! on to the next message. There is no timeout around `process`: a processor
//! that never returns stalls the consumer.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::error::ProcessError;
use crate::message::Payload;

/// Shared handle to a processor.
pub type ProcessorRef = Arc<dyn Processor>;

/// # Handles one decoded message.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use log_message_processor::{Payload, ProcessError, Processor};
///
/// struct Discard;
///
/// #[async_trait]
/// impl Processor for Discard {
///     fn name(&self) -> &str { "discard" }
///
///     async fn process(&self, _payload: Payload) -> Result<(), ProcessError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Processor: Send + Sync + 'static {
    /// Stable, human-readable processor name.
    fn name(&self) -> &str;

    /// Processes one message.
    async fn process(&self, payload: Payload) -> Result<(), ProcessError>;
}

/// Closure-backed processor.
#[derive(Debug)]
pub struct ProcessorFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProcessorFn<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the processor and returns it as a [`ProcessorRef`]-compatible handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Processor for ProcessorFn<F>
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProcessError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&self, payload: Payload) -> Result<(), ProcessError> {
        (self.f)(payload).await
    }
}

/// Default processor: waits a random delay, then logs the message.
#[derive(Clone, Debug)]
pub struct LogProcessor {
    max_delay: Duration,
}

impl Default for LogProcessor {
    /// Delays up to 2 seconds.
    fn default() -> Self {
        Self {
            max_delay: Duration::from_millis(2000),
        }
    }
}

impl LogProcessor {
    /// Processor with a custom upper bound (exclusive) on the simulated delay.
    pub fn with_max_delay(max_delay: Duration) -> Self {
        Self { max_delay }
    }

    fn pick_delay(&self) -> Duration {
        let max_ms = self.max_delay.as_millis().min(u128::from(u64::MAX)) as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max_ms))
    }
}

#[async_trait]
impl Processor for LogProcessor {
    fn name(&self) -> &str {
        "log"
    }

    async fn process(&self, payload: Payload) -> Result<(), ProcessError> {
        let delay = self.pick_delay();
        tokio::time::sleep(delay).await;
        tracing::info!(
            "message received after waiting for {}ms: {}",
            delay.as_millis(),
            payload
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[tokio::test]
    async fn closure_processor_receives_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let p: ProcessorRef = ProcessorFn::arc("collect", move |payload: Payload| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(payload);
                Ok(())
            }
        });

        assert_eq!(p.name(), "collect");
        p.process(Payload::Json(json!({"text": "hello"}))).await.unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Payload::Json(json!({"text": "hello"}))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn log_processor_delay_is_bounded() {
        let p = LogProcessor::with_max_delay(Duration::from_millis(50));
        for _ in 0..20 {
            assert!(p.pick_delay() < Duration::from_millis(50));
        }
        let before = tokio::time::Instant::now();
        p.process(Payload::Malformed("bad".into())).await.unwrap();
        assert!(before.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn zero_bound_means_no_delay() {
        assert_eq!(
            LogProcessor::with_max_delay(Duration::ZERO).pick_delay(),
            Duration::ZERO
        );
    }
}

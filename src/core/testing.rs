//! In-memory connectors, sessions, processors and reporters for loop tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::{ProcessError, ReportError, SessionError};
use crate::events::{Event, EventKind};
use crate::message::Payload;
use crate::processor::Processor;
use crate::session::{Connector, InboundEvent, Session};
use crate::trace::{Span, SpanReporter};

/// Outcome of one scripted `open`.
pub(crate) enum Open {
    /// Session replays the events, then reports the connection closed.
    Session(Vec<InboundEvent>),
    /// Session replays the events, then idles forever.
    Idle(Vec<InboundEvent>),
    Refuse(SessionError),
    Hang,
}

/// Plays back `Open` outcomes in order; refuses once the script is spent.
#[derive(Default)]
pub(crate) struct ScriptedConnector {
    script: Mutex<VecDeque<Open>>,
    opens: AtomicUsize,
    closes: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub(crate) fn new(script: Vec<Open>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        })
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn open(&self) -> Result<Box<dyn Session>, SessionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let (events, idle) = match next {
            Some(Open::Session(events)) => (events, false),
            Some(Open::Idle(events)) => (events, true),
            Some(Open::Refuse(err)) => return Err(err),
            Some(Open::Hang) => return std::future::pending().await,
            None => {
                return Err(SessionError::Connect {
                    reason: "connection refused".into(),
                });
            }
        };
        Ok(Box::new(ScriptedSession {
            events: events.into(),
            idle,
            closed: false,
            closes: self.closes.clone(),
        }))
    }

    fn endpoint(&self) -> String {
        "scripted:6379".into()
    }
}

struct ScriptedSession {
    events: VecDeque<InboundEvent>,
    idle: bool,
    closed: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl Session for ScriptedSession {
    async fn poll(&mut self, timeout: Duration) -> InboundEvent {
        if self.closed {
            return InboundEvent::Fatal(SessionError::Closed);
        }
        match self.events.pop_front() {
            Some(InboundEvent::Timeout) => {
                tokio::time::sleep(timeout).await;
                InboundEvent::Timeout
            }
            Some(ev) => ev,
            None if self.idle => {
                tokio::time::sleep(timeout).await;
                InboundEvent::Timeout
            }
            None => InboundEvent::Fatal(SessionError::Closed),
        }
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Records payloads; fails or panics on payloads whose `"fail"` field says so.
#[derive(Default)]
pub(crate) struct RecordingProcessor {
    pub(crate) seen: Mutex<Vec<Payload>>,
}

#[async_trait]
impl Processor for RecordingProcessor {
    fn name(&self) -> &str {
        "recording"
    }

    async fn process(&self, payload: Payload) -> Result<(), ProcessError> {
        self.seen.lock().unwrap().push(payload.clone());
        let mode = match &payload {
            Payload::Json(v) => v.get("fail").and_then(|f| f.as_str()).map(str::to_string),
            Payload::Malformed(_) => None,
        };
        match mode.as_deref() {
            Some("error") => Err(ProcessError::new("refused by processor")),
            Some("panic") => panic!("processor exploded"),
            _ => Ok(()),
        }
    }
}

/// Collector fake: records spans, or fails (or panics on) every report.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    pub(crate) spans: Mutex<Vec<Span>>,
    pub(crate) fail: bool,
    pub(crate) panic: bool,
}

impl RecordingReporter {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SpanReporter for RecordingReporter {
    async fn report(&self, spans: &[Span]) -> Result<(), ReportError> {
        if self.panic {
            panic!("reporter exploded");
        }
        if self.fail {
            return Err(ReportError::Status { status: 503 });
        }
        self.spans.lock().unwrap().extend_from_slice(spans);
        Ok(())
    }

    fn endpoint(&self) -> &str {
        "http://collector.test/api/v1/spans"
    }
}

/// Everything currently buffered on a bus receiver.
pub(crate) fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

pub(crate) fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind).collect()
}

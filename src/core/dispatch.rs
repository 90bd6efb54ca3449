//! # Per-message handling.
//!
//! [`Dispatcher::dispatch`] takes one raw payload through decode, the
//! optional span and the processor. Every failure on the way is published
//! on the bus and swallowed; nothing here can end the session.
//!
//! ```text
//! bytes ─► Payload::decode ──(Malformed → DecodeFailed)
//!            │
//!            ├─ emitter && zipkinSpan ─► TraceContext::from_field
//!            │                             ├─ Ok  ─► in_span(ctx, invoke) ──(Err → TraceReportFailed)
//!            │                             └─ Err ─► TraceContextInvalid ─► invoke
//!            └─ otherwise ─────────────────────────► invoke
//!
//! invoke: catch_unwind(processor.process)
//!           ├─ Err   → ProcessorFailed
//!           └─ panic → ProcessorPanicked
//! ```

use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::events::{Bus, Event, EventKind};
use crate::message::Payload;
use crate::processor::ProcessorRef;
use crate::subscribers::panic_message;
use crate::trace::{TraceContext, TraceEmitter};

pub(crate) struct Dispatcher {
    processor: ProcessorRef,
    emitter: Option<TraceEmitter>,
    bus: Bus,
}

impl Dispatcher {
    pub(crate) fn new(processor: ProcessorRef, emitter: Option<TraceEmitter>, bus: Bus) -> Self {
        Self {
            processor,
            emitter,
            bus,
        }
    }

    pub(crate) async fn dispatch(&self, raw: &[u8]) {
        let payload = Payload::decode(raw);
        if let Payload::Malformed(reason) = &payload {
            self.bus
                .publish(Event::new(EventKind::DecodeFailed).with_reason(reason.as_str()));
        }

        match (self.trace_context(&payload), self.emitter.as_ref()) {
            (Some(ctx), Some(emitter)) => {
                if let Err(e) = emitter.in_span(&ctx, self.invoke(payload)).await {
                    self.bus.publish(
                        Event::new(EventKind::TraceReportFailed)
                            .with_subject(emitter.collector())
                            .with_reason(e.to_string()),
                    );
                }
            }
            _ => self.invoke(payload).await,
        }
    }

    fn trace_context(&self, payload: &Payload) -> Option<TraceContext> {
        self.emitter.as_ref()?;
        let field = payload.trace_field()?;
        match TraceContext::from_field(field) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                self.bus.publish(
                    Event::new(EventKind::TraceContextInvalid).with_reason(e.to_string()),
                );
                None
            }
        }
    }

    async fn invoke(&self, payload: Payload) {
        let fut = self.processor.process(payload);
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.bus.publish(
                    Event::new(EventKind::ProcessorFailed)
                        .with_subject(self.processor.name())
                        .with_reason(e.to_string()),
                );
            }
            Err(panic_err) => {
                self.bus.publish(
                    Event::new(EventKind::ProcessorPanicked)
                        .with_subject(self.processor.name())
                        .with_reason(panic_message(&*panic_err)),
                );
            }
        }
    }
}

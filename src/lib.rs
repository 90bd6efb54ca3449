//! # log-message-processor
//!
//! A long-running consumer for one Redis pub/sub channel. Each message is
//! decoded as JSON, optionally wrapped in a Zipkin span, and handed to a
//! [`Processor`]. Connection failures are retried with capped exponential
//! backoff until a retry budget is spent.
//!
//! ## Architecture
//! ```text
//!               ┌──────────────────────────────────────────────────────┐
//!               │ Consumer (core)                                      │
//!               │  Connecting ─► Listening ─► ReconnectWait | Terminated│
//!               └──┬───────────────────┬───────────────────────┬───────┘
//!                  │ open / poll / close│ Message(bytes)        │ publish
//!                  ▼                   ▼                       ▼
//!           ┌────────────┐     ┌──────────────┐         ┌────────────┐
//!           │ Connector  │     │  Dispatcher  │         │    Bus     │
//!           │  Session   │     │ decode       │         │ (broadcast)│
//!           │ (redis)    │     │ TraceEmitter?│         └─────┬──────┘
//!           └────────────┘     │ Processor    │               ▼
//!                              └──────┬───────┘        SubscriberSet
//!                                     ▼                 └─► LogWriter
//!                              SpanReporter (HTTP, Thrift)
//! ```
//!
//! ## Lifecycle
//! ```text
//! loop {
//!   ├─► publish Connecting{ attempt, max }
//!   ├─► Connector::open()           (connect, PING, SUBSCRIBE; bounded)
//!   │     ├─ Ok  ─► Connected ─► poll(1s) until Fatal
//!   │     │          ├─ Timeout      ─► keep polling
//!   │     │          ├─ Confirmation ─► Subscribed
//!   │     │          ├─ Message      ─► decode ─► [span] ─► process
//!   │     │          ├─ Transient    ─► TransientError, keep polling
//!   │     │          └─ Fatal        ─► close, ConnectionLost
//!   │     └─ Err ─► ConnectFailed
//!   ├─► failures += 1
//!   ├─► failures >= max_retries ─► RetriesExhausted, return Err
//!   └─► BackoffScheduled{ delay } ─► sleep(delay) (cancellable)
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                             | Key types / traits                        |
//! |-------------------|---------------------------------------------------------|-------------------------------------------|
//! | **Consumer**      | Resilient consumption loop, cancellation, signals.      | [`Consumer`], [`ConsumerBuilder`]         |
//! | **Transport**     | Connect/subscribe/poll abstraction and Redis backend.   | [`Connector`], [`Session`], [`RedisConnector`] |
//! | **Processing**    | Business logic hook and the default simulated worker.   | [`Processor`], [`ProcessorFn`], [`LogProcessor`] |
//! | **Tracing**       | Zipkin context extraction and span reporting.           | [`TraceContext`], [`TraceEmitter`], [`SpanReporter`] |
//! | **Policies**      | Retry budget and backoff.                               | [`RetryPolicy`], [`BackoffPolicy`]        |
//! | **Subscriber API**| Observe lifecycle events.                               | [`Subscribe`], [`Event`], [`EventKind`]   |
//! | **Errors**        | Typed errors with stable labels.                        | [`ConfigError`], [`RuntimeError`], ...    |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use log_message_processor::{Config, Consumer, Payload, ProcessorFn, ProcessorRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config {
//!         host: "localhost".into(),
//!         channel: "log_channel".into(),
//!         ..Config::default()
//!     };
//!
//!     let print: ProcessorRef = ProcessorFn::arc("print", |payload: Payload| async move {
//!         println!("{payload}");
//!         Ok(())
//!     });
//!
//!     let consumer = Consumer::builder(cfg).with_processor(print).build()?;
//!     consumer.run_until_signal().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod message;
mod policies;
mod processor;
mod session;
mod subscribers;
mod trace;

pub mod logging;

// ---- Public re-exports ----

pub use config::{Config, MANAGED_HOST_SUFFIX};
pub use core::{Consumer, ConsumerBuilder};
pub use error::{
    ConfigError, DecodeError, ProcessError, ReportError, RuntimeError, SessionError, TraceError,
};
pub use events::{Bus, Event, EventKind};
pub use message::{Payload, TRACE_FIELD, decode};
pub use policies::{BackoffPolicy, RetryPolicy, RetryReset};
pub use processor::{LogProcessor, Processor, ProcessorFn, ProcessorRef};
pub use session::{Connector, InboundEvent, RedisConnector, RedisSession, Session};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use trace::{
    HttpReporter, SERVICE_NAME, SPAN_NAME, Span, SpanReporter, THRIFT_CONTENT_TYPE, TraceContext,
    TraceEmitter, TraceId, encode_span_list, new_span_id,
};

//! Distributed tracing of message processing (Zipkin).
//!
//! ## Contents
//! - [`TraceContext`], [`TraceId`] upstream context read from `zipkinSpan`
//! - [`Span`] a finished processing span
//! - [`SpanReporter`], [`HttpReporter`] delivery to the collector
//! - [`TraceEmitter`] runs work inside a span and reports it
//! - `thrift` Zipkin v1 binary encoding used by [`HttpReporter`]
//!
//! Tracing is active only when a collector URL is configured and the message
//! carries a `zipkinSpan` field. Delivery failures never reach the caller's
//! control flow; they come back as a [`ReportError`](crate::ReportError) to
//! be logged.

mod context;
mod emitter;
mod reporter;
mod span;
mod thrift;

pub use context::{TraceContext, TraceId, new_span_id};
pub use emitter::{SERVICE_NAME, SPAN_NAME, TraceEmitter};
pub use reporter::{HttpReporter, SpanReporter, THRIFT_CONTENT_TYPE};
pub use span::Span;
pub use thrift::encode_span_list;

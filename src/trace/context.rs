//! # Propagated trace context.
//!
//! Upstream services embed their Zipkin context in the message as
//! `zipkinSpan`:
//!
//! ```json
//! { "zipkinSpan": { "_traceId": { "value": "5af7183fb1d4cf5f" },
//!                   "_spanId": "6b221d5bc9e6496c",
//!                   "_sampled": { "value": true } } }
//! ```
//!
//! The upstream span becomes the parent; a fresh span id is generated for
//! the processing span.

use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

use crate::error::TraceError;

/// Zipkin trace id (64 or 128 bit).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceId {
    /// Upper 64 bits of a 128-bit id.
    pub high: Option<u64>,
    /// Lower 64 bits.
    pub low: u64,
}

impl TraceId {
    /// Parses 1–32 hex digits; more than 16 digits yields a 128-bit id.
    pub fn parse_hex(s: &str) -> Option<Self> {
        match s.len() {
            1..=16 => Some(Self {
                high: None,
                low: parse_hex_u64(s)?,
            }),
            17..=32 => {
                let (high, low) = s.split_at(s.len() - 16);
                Some(Self {
                    high: Some(parse_hex_u64(high)?),
                    low: parse_hex_u64(low)?,
                })
            }
            _ => None,
        }
    }
}

/// Context of one message's processing span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: TraceId,
    /// Freshly generated id of the processing span.
    pub span_id: u64,
    /// The upstream span.
    pub parent_id: u64,
    /// Upstream sampling decision; `None` when undecided. Informational:
    /// spans are reported either way.
    pub sampled: Option<bool>,
}

#[derive(Deserialize)]
struct Wrapped<T> {
    value: T,
}

#[derive(Deserialize)]
struct WireContext {
    #[serde(rename = "_traceId")]
    trace_id: Wrapped<String>,
    #[serde(rename = "_spanId")]
    span_id: String,
    #[serde(rename = "_sampled", default)]
    sampled: Option<Wrapped<Option<bool>>>,
}

impl TraceContext {
    /// Builds a context from a `zipkinSpan` value with a fresh span id.
    pub fn from_field(field: &Value) -> Result<Self, TraceError> {
        Self::from_field_with_span(field, new_span_id())
    }

    /// Builds a context from a `zipkinSpan` value using the given span id.
    pub fn from_field_with_span(field: &Value, span_id: u64) -> Result<Self, TraceError> {
        let wire = WireContext::deserialize(field)?;

        let trace_id =
            TraceId::parse_hex(&wire.trace_id.value).ok_or_else(|| TraceError::InvalidId {
                field: "trace id",
                value: wire.trace_id.value.clone(),
            })?;
        let parent_id = parse_hex_u64(&wire.span_id).ok_or_else(|| TraceError::InvalidId {
            field: "span id",
            value: wire.span_id.clone(),
        })?;

        Ok(Self {
            trace_id,
            span_id,
            parent_id,
            sampled: wire.sampled.and_then(|s| s.value),
        })
    }
}

/// Random non-zero 64-bit span id.
pub fn new_span_id() -> u64 {
    rand::rng().random_range(1..=u64::MAX)
}

fn parse_hex_u64(s: &str) -> Option<u64> {
    if s.is_empty() || s.len() > 16 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(s, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_upstream_context() {
        let field = json!({
            "_traceId": { "value": "5af7183fb1d4cf5f" },
            "_spanId": "6b221d5bc9e6496c",
            "_sampled": { "value": true }
        });
        let ctx = TraceContext::from_field_with_span(&field, 7).unwrap();
        assert_eq!(
            ctx.trace_id,
            TraceId {
                high: None,
                low: 0x5af7183fb1d4cf5f
            }
        );
        assert_eq!(ctx.parent_id, 0x6b221d5bc9e6496c);
        assert_eq!(ctx.span_id, 7);
        assert_eq!(ctx.sampled, Some(true));
    }

    #[test]
    fn accepts_128_bit_trace_ids() {
        let id = TraceId::parse_hex("463ac35c9f6413ad48485a3953bb6124").unwrap();
        assert_eq!(id.high, Some(0x463ac35c9f6413ad));
        assert_eq!(id.low, 0x48485a3953bb6124);
    }

    #[test]
    fn missing_or_null_sampling_flag_is_undecided() {
        let field = json!({ "_traceId": { "value": "a" }, "_spanId": "b" });
        let ctx = TraceContext::from_field(&field).unwrap();
        assert_eq!(ctx.sampled, None);
        assert_ne!(ctx.span_id, 0);

        let field = json!({ "_traceId": { "value": "a" }, "_spanId": "b", "_sampled": { "value": null } });
        assert_eq!(TraceContext::from_field(&field).unwrap().sampled, None);
    }

    #[test]
    fn explicit_false_is_kept_as_metadata() {
        let field = json!({ "_traceId": { "value": "a" }, "_spanId": "b", "_sampled": { "value": false } });
        assert_eq!(TraceContext::from_field(&field).unwrap().sampled, Some(false));
    }

    #[test]
    fn rejects_bad_shapes_and_ids() {
        assert!(matches!(
            TraceContext::from_field(&json!("nope")),
            Err(TraceError::Shape(_))
        ));
        assert!(matches!(
            TraceContext::from_field(&json!({ "_traceId": { "value": "xyz" }, "_spanId": "b" })),
            Err(TraceError::InvalidId { field: "trace id", .. })
        ));
        assert!(matches!(
            TraceContext::from_field(&json!({ "_traceId": { "value": "a" }, "_spanId": "+1" })),
            Err(TraceError::InvalidId { field: "span id", .. })
        ));
    }
}

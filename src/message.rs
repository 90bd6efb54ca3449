//! # Message decoding.
//!
//! Inbound payloads are UTF-8 JSON. [`Payload::decode`] never fails: bytes
//! that cannot be decoded become [`Payload::Malformed`] carrying the error
//! text, so the processor is invoked the same way either way.
//!
//! ```text
//! bytes ──► utf-8 ──► json ──► Payload::Json(value)
//!             └─────────┴────► Payload::Malformed("payload is not valid ...")
//! ```

use std::fmt;

use serde_json::Value;

use crate::error::DecodeError;

/// Field that carries propagated Zipkin context.
pub const TRACE_FIELD: &str = "zipkinSpan";

/// A decoded message, or the description of why decoding failed.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Successfully parsed JSON.
    Json(Value),
    /// Decode failure description, delivered in place of the message.
    Malformed(String),
}

impl Payload {
    /// Decodes raw bytes, converting failures into [`Payload::Malformed`].
    pub fn decode(raw: &[u8]) -> Self {
        match decode(raw) {
            Ok(value) => Payload::Json(value),
            Err(e) => Payload::Malformed(e.to_string()),
        }
    }

    /// Returns the propagated tracing object, if the message is a JSON object carrying one.
    pub fn trace_field(&self) -> Option<&Value> {
        match self {
            Payload::Json(Value::Object(map)) => map.get(TRACE_FIELD),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Payload::Malformed(_))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(v) => write!(f, "{v}"),
            Payload::Malformed(reason) => f.write_str(reason),
        }
    }
}

/// Strict decode: UTF-8 then JSON.
pub fn decode(raw: &[u8]) -> Result<Value, DecodeError> {
    let text = std::str::from_utf8(raw)?;
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_json_object() {
        let payload = Payload::decode(br#"{"text":"hello"}"#);
        assert_eq!(payload, Payload::Json(json!({"text": "hello"})));
        assert_eq!(payload.trace_field(), None);
    }

    #[test]
    fn invalid_json_becomes_description() {
        let payload = Payload::decode(b"not-json");
        match payload {
            Payload::Malformed(reason) => {
                assert!(reason.starts_with("payload is not valid json"), "{reason}")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_becomes_description() {
        let payload = Payload::decode(&[0xff, 0xfe, b'{']);
        assert!(payload.is_malformed());
        assert!(payload.to_string().contains("utf-8"));
    }

    #[test]
    fn trace_field_only_on_objects() {
        let payload = Payload::decode(br#"{"zipkinSpan":{"_spanId":"a"}}"#);
        assert_eq!(payload.trace_field(), Some(&json!({"_spanId": "a"})));

        let payload = Payload::decode(br#"["zipkinSpan"]"#);
        assert_eq!(payload.trace_field(), None);
    }
}

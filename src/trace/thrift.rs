//! # Zipkin v1 Thrift encoding.
//!
//! Collectors accepting `application/x-thrift` expect a list of
//! `zipkinCore.Span` structs in the Thrift binary protocol (big-endian).
//!
//! ```text
//! list  := elem_type:i8 size:i32 elem*
//! struct:= (field_type:i8 field_id:i16 value)* STOP
//! string:= len:i32 bytes
//! ```
//!
//! Field ids:
//! ```text
//! Span          1 trace_id  3 name  4 id  5 parent_id  6 annotations
//!               8 binary_annotations  9 debug  10 timestamp  11 duration
//!               12 trace_id_high
//! Annotation    1 timestamp  2 value  3 host
//! Endpoint      1 ipv4  2 port  3 service_name
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::span::{SERVER_RECV, SERVER_SEND, Span};

const T_STOP: u8 = 0;
const T_BOOL: u8 = 2;
const T_I16: u8 = 6;
const T_I32: u8 = 8;
const T_I64: u8 = 10;
const T_STRING: u8 = 11;
const T_STRUCT: u8 = 12;
const T_LIST: u8 = 15;

/// Encodes spans as a Thrift list of structs.
pub fn encode_span_list(spans: &[Span]) -> Bytes {
    let mut buf = BytesMut::with_capacity(128 * spans.len().max(1));
    buf.put_u8(T_STRUCT);
    buf.put_i32(spans.len() as i32);
    for span in spans {
        write_span(&mut buf, span);
    }
    buf.freeze()
}

fn write_span(buf: &mut BytesMut, span: &Span) {
    field(buf, T_I64, 1);
    buf.put_u64(span.trace_id.low);

    field(buf, T_STRING, 3);
    string(buf, &span.name);

    field(buf, T_I64, 4);
    buf.put_u64(span.id);

    if let Some(parent) = span.parent_id {
        field(buf, T_I64, 5);
        buf.put_u64(parent);
    }

    field(buf, T_LIST, 6);
    buf.put_u8(T_STRUCT);
    buf.put_i32(2);
    write_annotation(buf, span.timestamp_us, SERVER_RECV, &span.service);
    write_annotation(buf, span.end_us(), SERVER_SEND, &span.service);

    field(buf, T_LIST, 8);
    buf.put_u8(T_STRUCT);
    buf.put_i32(0);

    field(buf, T_BOOL, 9);
    buf.put_u8(u8::from(span.debug));

    field(buf, T_I64, 10);
    buf.put_i64(span.timestamp_us);

    field(buf, T_I64, 11);
    buf.put_i64(span.duration_us);

    if let Some(high) = span.trace_id.high {
        field(buf, T_I64, 12);
        buf.put_u64(high);
    }

    buf.put_u8(T_STOP);
}

fn write_annotation(buf: &mut BytesMut, timestamp_us: i64, value: &str, service: &str) {
    field(buf, T_I64, 1);
    buf.put_i64(timestamp_us);

    field(buf, T_STRING, 2);
    string(buf, value);

    field(buf, T_STRUCT, 3);
    write_endpoint(buf, service);

    buf.put_u8(T_STOP);
}

fn write_endpoint(buf: &mut BytesMut, service: &str) {
    field(buf, T_I32, 1);
    buf.put_i32(0);

    field(buf, T_I16, 2);
    buf.put_i16(0);

    field(buf, T_STRING, 3);
    string(buf, service);

    buf.put_u8(T_STOP);
}

#[inline]
fn field(buf: &mut BytesMut, ty: u8, id: i16) {
    buf.put_u8(ty);
    buf.put_i16(id);
}

#[inline]
fn string(buf: &mut BytesMut, s: &str) {
    buf.put_i32(s.len() as i32);
    buf.put_slice(s.as_bytes());
}

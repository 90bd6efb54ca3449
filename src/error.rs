//! Error types used by the consumer runtime and its collaborators.
//!
//! - [`ConfigError`]: configuration rejected before any connection attempt.
//! - [`SessionError`]: transport failures, classified transient or fatal.
//! - [`DecodeError`]: payload could not be turned into JSON.
//! - [`TraceError`]: a `zipkinSpan` field that cannot be interpreted.
//! - [`ReportError`]: span delivery to the collector failed.
//! - [`ProcessError`]: the message processor reported a failure.
//! - [`RuntimeError`]: terminal outcome of the consumption loop.
//!
//! Every type provides `as_label` (stable snake_case label for logs).

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while validating configuration.
///
/// Any of these aborts the process before a connection is attempted.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Managed (hosted) backends require a credential.
    #[error("credential is required for managed host {host}")]
    MissingCredential {
        /// Host that triggered the requirement.
        host: String,
    },

    /// Channel name must not be empty.
    #[error("channel name must not be empty")]
    EmptyChannel,

    /// Port `0` cannot be connected to.
    #[error("invalid port {port}")]
    InvalidPort {
        /// Offending port.
        port: u16,
    },

    /// Collector URL could not be parsed.
    #[error("invalid collector url {url:?}: {reason}")]
    InvalidCollectorUrl {
        /// The URL as configured.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The collector HTTP client could not be initialised.
    #[error("cannot build collector client: {reason}")]
    HttpClient {
        /// Underlying error message.
        reason: String,
    },

    /// Unknown retry reset policy name.
    #[error("unknown retry reset policy {value:?} (expected \"never\" or \"on-listening\")")]
    InvalidResetPolicy {
        /// The rejected value.
        value: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingCredential { .. } => "config_missing_credential",
            ConfigError::EmptyChannel => "config_empty_channel",
            ConfigError::InvalidPort { .. } => "config_invalid_port",
            ConfigError::InvalidCollectorUrl { .. } => "config_invalid_collector_url",
            ConfigError::HttpClient { .. } => "config_http_client",
            ConfigError::InvalidResetPolicy { .. } => "config_invalid_reset_policy",
        }
    }
}

/// # Errors produced by a subscription session.
///
/// Timeout-class errors are transient: the session keeps polling.
/// Everything else is fatal and forces a full reconnect.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Connection could not be established (refused, auth, subscribe failed).
    #[error("connect failed: {reason}")]
    Connect {
        /// Underlying error message.
        reason: String,
    },

    /// Connection attempt exceeded the connect timeout.
    #[error("connect timed out after {timeout:?}")]
    ConnectTimeout {
        /// The connect timeout that was exceeded.
        timeout: Duration,
    },

    /// A read timed out at the transport level.
    #[error("read timed out: {reason}")]
    ReadTimeout {
        /// Underlying error message.
        reason: String,
    },

    /// Connection broke while listening.
    #[error("transport error: {reason}")]
    Transport {
        /// Underlying error message.
        reason: String,
    },

    /// The server closed the subscription stream, or the session was closed.
    #[error("connection closed")]
    Closed,
}

impl SessionError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SessionError::Connect { .. } => "session_connect",
            SessionError::ConnectTimeout { .. } => "session_connect_timeout",
            SessionError::ReadTimeout { .. } => "session_read_timeout",
            SessionError::Transport { .. } => "session_transport",
            SessionError::Closed => "session_closed",
        }
    }
}

/// # Errors produced while decoding a payload.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Payload is not valid UTF-8.
    #[error("payload is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Payload is not valid JSON.
    #[error("payload is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DecodeError::Utf8(_) => "decode_utf8",
            DecodeError::Json(_) => "decode_json",
        }
    }
}

/// # Errors produced while reading tracing fields from a message.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TraceError {
    /// `zipkinSpan` does not have the expected shape.
    #[error("malformed zipkinSpan: {0}")]
    Shape(#[from] serde_json::Error),

    /// An id is not a valid hex number of the expected width.
    #[error("invalid {field} {value:?}")]
    InvalidId {
        /// Which id was rejected.
        field: &'static str,
        /// The rejected text.
        value: String,
    },
}

impl TraceError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TraceError::Shape(_) => "trace_shape",
            TraceError::InvalidId { .. } => "trace_invalid_id",
        }
    }
}

/// # Errors produced while reporting a span to the collector.
///
/// Never propagated past the trace emitter; logged and dropped.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReportError {
    /// Network-level failure.
    #[error("collector request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Collector answered with a non-2xx status.
    #[error("collector returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The reporter panicked.
    #[error("collector reporter panicked: {reason}")]
    Panicked {
        /// Panic message.
        reason: String,
    },

    /// Report did not complete within the bound.
    #[error("collector request timed out after {timeout:?}")]
    Timeout {
        /// The bound that was exceeded.
        timeout: Duration,
    },
}

impl ReportError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ReportError::Http(_) => "report_http",
            ReportError::Status { .. } => "report_status",
            ReportError::Panicked { .. } => "report_panicked",
            ReportError::Timeout { .. } => "report_timeout",
        }
    }
}

/// # Error reported by a message processor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("processing failed: {reason}")]
pub struct ProcessError {
    /// Human-readable failure description.
    pub reason: String,
}

impl ProcessError {
    /// Creates a new processing error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// # Terminal outcomes of the consumption loop.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The retry budget was spent; no further connect is attempted.
    #[error("max retries ({retries}) reached, giving up")]
    RetriesExhausted {
        /// Number of recorded failures.
        retries: u32,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use log_message_processor::RuntimeError;
    ///
    /// let err = RuntimeError::RetriesExhausted { retries: 5 };
    /// assert_eq!(err.as_label(), "runtime_retries_exhausted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::RetriesExhausted { .. } => "runtime_retries_exhausted",
        }
    }
}

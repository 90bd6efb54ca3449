//! # Subscription sessions.
//!
//! A [`Connector`] opens [`Session`]s; a session is one live connection with an
//! active channel subscription. The consumption loop owns exactly one session
//! at a time and replaces it on reconnect.
//!
//! ```text
//! Connector::open() ──► Session
//!                         ├─ poll(timeout) ─► InboundEvent
//!                         │                    ├─ Confirmation { channel }
//!                         │                    ├─ Message(bytes)
//!                         │                    ├─ Timeout
//!                         │                    ├─ Transient(err)   keep polling (custom sessions)
//!                         │                    └─ Fatal(err)       reconnect
//!                         └─ close()           idempotent
//! ```

mod redis;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SessionError;

pub use redis::{RedisConnector, RedisSession};

/// One outcome of [`Session::poll`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// The server acknowledged the channel subscription.
    Confirmation { channel: String },
    /// A published payload.
    Message(Bytes),
    /// Nothing arrived within the poll timeout.
    Timeout,
    /// Recoverable error; the session is still usable. The Redis session
    /// never yields it, custom sessions may.
    Transient(SessionError),
    /// Connection-class error; the session must be torn down.
    Fatal(SessionError),
}

/// Opens subscription sessions.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Connects (bounded by a connect timeout), checks liveness and subscribes.
    async fn open(&self) -> Result<Box<dyn Session>, SessionError>;

    /// Where sessions connect to (for logs).
    fn endpoint(&self) -> String;
}

/// A connected, subscribed channel handle.
#[async_trait]
pub trait Session: Send {
    /// Waits up to `timeout` for the next event.
    async fn poll(&mut self, timeout: Duration) -> InboundEvent;

    /// Releases the connection. Calling it again is a no-op.
    async fn close(&mut self);
}

//! Runtime core: the consumption loop and its helpers.
//!
//! The public API of this module is [`Consumer`] and [`ConsumerBuilder`].
//!
//! Internal modules:
//! - [`consumer`]: Connecting → Listening → ReconnectWait | Terminated;
//! - [`dispatch`]: decode, optional span and processor call for one message;
//! - [`retry`]: failure count and backoff decisions;
//! - [`shutdown`]: OS signal handling;
//! - [`builder`]: assembles a consumer from config and injected parts.

mod builder;
mod consumer;
mod dispatch;
mod retry;
mod shutdown;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::ConsumerBuilder;
pub use consumer::Consumer;

//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom handlers into the
//! consumer's lifecycle events (alerting, counters, audit trails).
//!
//! ## Contract
//! - Subscribers run on the listener task, never on the consumption loop, so a
//!   slow subscriber delays other subscribers but not message handling.
//! - A panicking subscriber is logged and skipped for that event.
//!
//! ## Example
//! ```rust
//! use log_message_processor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! #[derive(Default)]
//! struct ReconnectCounter(AtomicU32);
//!
//! #[async_trait]
//! impl Subscribe for ReconnectCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::BackoffScheduled {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "reconnect-counter" }
//! }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

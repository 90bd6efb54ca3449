//! # Event bus for lifecycle events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]. The consumption loop and the
//! message dispatcher publish; the consumer's listener task (and tests)
//! subscribe.
//!
//! ```text
//! Consumer loop ──┐
//! Dispatcher   ───┼──► Bus ──► listener ──► Subscribe::on_event (LogWriter, ...)
//! run_until_signal┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks; events published with no receiver are dropped.
//! - Receivers that fall more than `capacity` events behind observe `Lagged`.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for [`Event`]s. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus with the given capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to every current receiver.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

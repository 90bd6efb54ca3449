//! # Event fan-out to subscribers.
//!
//! [`SubscriberSet`] delivers each [`Event`] to every subscriber in order, on a
//! dedicated listener task fed by the [`Bus`].
//!
//! ```text
//! Bus ──► listener ──► sub1.on_event() ──► sub2.on_event() ──► ...
//!                        └─ panic → logged, next subscriber
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**: every subscriber sees events in publish order.
//! - **Isolation**: a panicking subscriber is caught with `catch_unwind`.
//! - **Drain on stop**: once the stop token fires, events already on the bus
//!   are still delivered before the listener exits.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Ordered collection of subscribers.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Delivers one event to every subscriber, isolating panics.
    pub async fn emit(&self, event: &Event) {
        for sub in &self.subs {
            let fut = sub.on_event(event);
            if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                tracing::error!(
                    subscriber = sub.name(),
                    info = %panic_message(&*panic_err),
                    "event subscriber panicked"
                );
            }
        }
    }

    /// Spawns the listener task.
    ///
    /// The receiver is created before this returns, so every event published
    /// afterwards is observed. The task exits after `stop` fires and the bus
    /// backlog is drained.
    pub fn spawn_listener(self, bus: &Bus, stop: CancellationToken) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    res = rx.recv() => match res {
                        Ok(ev) => self.emit(&ev).await,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "event listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = stop.cancelled() => {
                        loop {
                            match rx.try_recv() {
                                Ok(ev) => self.emit(&ev).await,
                                Err(TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }
                        break;
                    }
                }
            }
        })
    }
}

/// Extracts a printable message from a panic payload.
pub(crate) fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Consumer events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `core::consumer` (connection/retry/shutdown),
//!   `core::dispatch` (per-message failures).
//! - **Consumers**: the listener spawned by `Consumer::run`, which forwards
//!   to every [`Subscribe`](crate::Subscribe) implementation.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

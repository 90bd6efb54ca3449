//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] that
//! drives it, and the built-in [`LogWriter`].
//!
//! ```text
//! Consumer ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                        ├──► LogWriter (tracing)
//!                                                        └──► custom subscribers
//! ```

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
pub(crate) use subscriber_set::panic_message;

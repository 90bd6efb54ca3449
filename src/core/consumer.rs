//! # Consumer: the resilient consumption loop.
//!
//! Owns one session at a time and keeps it alive across failures, within the
//! retry budget.
//!
//! ## State machine
//! ```text
//!             ┌────────────────────────────────────────────────┐
//!             ▼                                                │
//! ┌─► Connecting ── open() ok ──► Listening ── Fatal ──┐       │
//! │       │                        │  ▲                │       │
//! │       │ err                    └──┘ Timeout |      │       │
//! │       │                       Confirmation |       │       │
//! │       │                  Message | Transient       │       │
//! │       ▼                                            ▼       │
//! │   record_failure ◄─────────────────────────────────┘       │
//! │       ├─ Backoff(d) ─► ReconnectWait ── sleep(d) ──────────┘
//! │       └─ Exhausted  ─► Terminated (RetriesExhausted)
//! │
//! └── cancellation at any await point ─► close session ─► Stopped
//! ```
//!
//! ## Rules
//! - Timeouts and transient errors never count as failures.
//! - Connect failures and lost sessions count the same.
//! - After `Exhausted` no further connect is attempted.
//! - A lost session is closed before the failure is recorded.
//! - `run` returns only after every published event reached the subscribers.

use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use super::dispatch::Dispatcher;
use super::retry::{RetryDecision, RetryState};
use super::shutdown;
use crate::config::Config;
use crate::error::{RuntimeError, SessionError};
use crate::events::{Bus, Event, EventKind};
use crate::session::{Connector, InboundEvent, Session};
use crate::subscribers::SubscriberSet;

/// Why listening on a session ended.
enum ListenExit {
    Cancelled,
    Lost(SessionError),
}

/// Consumes one channel until cancelled or out of retries.
///
/// Built with [`ConsumerBuilder`](crate::ConsumerBuilder).
pub struct Consumer {
    cfg: Config,
    connector: Arc<dyn Connector>,
    dispatcher: Dispatcher,
    bus: Bus,
    subs: SubscriberSet,
}

impl Consumer {
    pub(crate) fn new_internal(
        cfg: Config,
        connector: Arc<dyn Connector>,
        dispatcher: Dispatcher,
        bus: Bus,
        subs: SubscriberSet,
    ) -> Self {
        Self {
            cfg,
            connector,
            dispatcher,
            bus,
            subs,
        }
    }

    /// Starts a [`ConsumerBuilder`](crate::ConsumerBuilder) for `cfg`.
    pub fn builder(cfg: Config) -> crate::ConsumerBuilder {
        crate::ConsumerBuilder::new(cfg)
    }

    /// Event bus of this consumer. Receivers see events published from now on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Runs until `token` is cancelled (`Ok`) or the retry budget is spent.
    ///
    /// # Errors
    /// [`RuntimeError::RetriesExhausted`] once `max_retries` failures were recorded.
    pub async fn run(self, token: CancellationToken) -> Result<(), RuntimeError> {
        let stop = CancellationToken::new();
        let listener = self.subs.clone().spawn_listener(&self.bus, stop.clone());

        let res = self.drive(&token).await;

        stop.cancel();
        if let Err(e) = listener.await {
            tracing::error!(error = %e, "event listener task failed");
        }
        res
    }

    /// Runs until SIGINT/SIGTERM/SIGQUIT (Ctrl-C off Unix) or retry exhaustion.
    pub async fn run_until_signal(self) -> Result<(), RuntimeError> {
        let token = CancellationToken::new();
        let watcher = shutdown::watch_signals(self.bus.clone(), token.clone());
        let res = self.run(token).await;
        watcher.abort();
        res
    }

    async fn drive(&self, token: &CancellationToken) -> Result<(), RuntimeError> {
        let mut retry = RetryState::new(self.cfg.retry);
        let endpoint = self.connector.endpoint();

        if retry.is_exhausted() {
            return Err(self.exhausted(&retry));
        }

        loop {
            self.bus.publish(
                Event::new(EventKind::Connecting)
                    .with_subject(endpoint.as_str())
                    .with_attempt(retry.attempt())
                    .with_max_attempts(retry.max_retries()),
            );

            let opened = select! {
                biased;
                _ = token.cancelled() => return self.stopped(),
                res = self.connector.open() => res,
            };

            let reason = match opened {
                Ok(mut session) => {
                    self.bus
                        .publish(Event::new(EventKind::Connected).with_subject(endpoint.as_str()));
                    if retry.on_listening() {
                        self.bus.publish(Event::new(EventKind::RetryReset));
                    }

                    let exit = self.listen(session.as_mut(), token).await;
                    session.close().await;
                    match exit {
                        ListenExit::Cancelled => return self.stopped(),
                        ListenExit::Lost(err) => {
                            self.bus.publish(
                                Event::new(EventKind::ConnectionLost)
                                    .with_subject(endpoint.as_str())
                                    .with_reason(err.to_string()),
                            );
                            err.to_string()
                        }
                    }
                }
                Err(err) => {
                    self.bus.publish(
                        Event::new(EventKind::ConnectFailed)
                            .with_subject(endpoint.as_str())
                            .with_attempt(retry.attempt())
                            .with_reason(err.to_string()),
                    );
                    err.to_string()
                }
            };

            match retry.record_failure() {
                RetryDecision::Exhausted => return Err(self.exhausted(&retry)),
                RetryDecision::Backoff(delay) => {
                    self.bus.publish(
                        Event::new(EventKind::BackoffScheduled)
                            .with_attempt(retry.failures())
                            .with_max_attempts(retry.max_retries())
                            .with_delay(delay)
                            .with_reason(reason),
                    );
                    select! {
                        biased;
                        _ = token.cancelled() => return self.stopped(),
                        _ = time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    async fn listen(&self, session: &mut dyn Session, token: &CancellationToken) -> ListenExit {
        loop {
            let event = select! {
                biased;
                _ = token.cancelled() => return ListenExit::Cancelled,
                ev = session.poll(self.cfg.poll_timeout) => ev,
            };

            match event {
                InboundEvent::Timeout => {}
                InboundEvent::Confirmation { channel } => {
                    self.bus
                        .publish(Event::new(EventKind::Subscribed).with_subject(channel));
                }
                InboundEvent::Message(raw) => self.dispatcher.dispatch(&raw).await,
                InboundEvent::Transient(err) => {
                    self.bus
                        .publish(Event::new(EventKind::TransientError).with_reason(err.to_string()));
                }
                InboundEvent::Fatal(err) => return ListenExit::Lost(err),
            }
        }
    }

    fn exhausted(&self, retry: &RetryState) -> RuntimeError {
        self.bus.publish(
            Event::new(EventKind::RetriesExhausted)
                .with_attempt(retry.failures())
                .with_max_attempts(retry.max_retries()),
        );
        RuntimeError::RetriesExhausted {
            retries: retry.failures(),
        }
    }

    fn stopped(&self) -> Result<(), RuntimeError> {
        self.bus.publish(Event::new(EventKind::Stopped));
        Ok(())
    }
}

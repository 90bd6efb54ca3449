//! # OS signal handling.
//!
//! [`watch_signals`] spawns a task that waits for a termination signal,
//! publishes [`EventKind::ShutdownRequested`] and cancels the loop's token.
//!
//! Signals: `SIGINT`, `SIGTERM` and `SIGQUIT` on Unix; Ctrl-C elsewhere.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

/// Completes when the process receives a termination signal.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Cancels `token` on the first termination signal.
///
/// If handlers cannot be installed the failure is logged and the token is
/// left alone; the consumer then runs until its retries are exhausted.
pub(crate) fn watch_signals(bus: Bus, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(()) => {
                bus.publish(Event::new(EventKind::ShutdownRequested));
                token.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "cannot install signal handlers"),
        }
    })
}

//! OS signals that end the session
//!
//! Any of them quits at once, skipping the quit confirmation. Which one
//! arrived is carried in [`Message::Shutdown`] so the update function can
//! log what was abandoned.

use farmdesk_core::prelude::*;
use tokio::sync::mpsc;

use crate::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    Hangup,
}

impl ShutdownSignal {
    pub fn name(self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
            ShutdownSignal::Hangup => "SIGHUP",
        }
    }
}

/// Listen for the first shutdown signal and forward it to the event loop.
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        match next_signal().await {
            Ok(signal) => {
                debug!("Forwarding {}", signal.name());
                if tx.send(Message::Shutdown(signal)).await.is_err() {
                    debug!("Event loop already gone; ignoring {}", signal.name());
                }
            }
            Err(e) => error!("Signal handler error: {}", e),
        }
    });
}

#[cfg(unix)]
async fn next_signal() -> Result<ShutdownSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let listen = |kind: SignalKind, signal_kind: ShutdownSignal| {
        signal(kind).map_err(|e| {
            Error::terminal(format!("Failed to listen for {}: {}", signal_kind.name(), e))
        })
    };
    let mut sigint = listen(SignalKind::interrupt(), ShutdownSignal::Interrupt)?;
    let mut sigterm = listen(SignalKind::terminate(), ShutdownSignal::Terminate)?;
    let mut sighup = listen(SignalKind::hangup(), ShutdownSignal::Hangup)?;

    Ok(tokio::select! {
        _ = sigint.recv() => ShutdownSignal::Interrupt,
        _ = sigterm.recv() => ShutdownSignal::Terminate,
        _ = sighup.recv() => ShutdownSignal::Hangup,
    })
}

#[cfg(not(unix))]
async fn next_signal() -> Result<ShutdownSignal> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::terminal(format!("Failed to listen for Ctrl+C: {}", e)))?;
    Ok(ShutdownSignal::Interrupt)
}

//! Foreground push message handling.
//!
//! Normalizes each delivered payload at the boundary and renders it as a
//! long-lived toast. Messages are consumed once; nothing is stored.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use domain::models::{PushEnvelope, PushMessage};

use crate::metrics;
use crate::ui::{Toast, ToastStack};

/// Render one foreground push message.
pub fn handle_foreground_message(toasts: &ToastStack, envelope: PushEnvelope) {
    let message = PushMessage::from_wire(envelope);
    info!(
        kind = %message.data.kind,
        title = message.title.as_deref().unwrap_or("Notification"),
        action_required = message.data.action_required,
        "Push message received"
    );
    metrics::record_push_message(&message.data.kind);
    toasts.push(Toast::push_toast(&message, Instant::now()));
}

/// Consume the foreground message stream until it closes or shutdown.
pub fn spawn_foreground_handler(
    mut messages: mpsc::Receiver<PushEnvelope>,
    toasts: Arc<ToastStack>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                message = messages.recv() => match message {
                    Some(envelope) => handle_foreground_message(&toasts, envelope),
                    None => {
                        info!("Push message stream ended");
                        break;
                    }
                },
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

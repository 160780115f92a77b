//! Alert stream client.
//!
//! Inbound events are routed through an explicit dispatch table mapping
//! event name to handler, so the control flow is auditable and testable
//! without a live transport. The WebSocket runner lives in [`transport`].

pub mod transport;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use domain::models::{Alert, PermissionState};
use domain::services::{Notifier, NotifyOutcome, OsNotification};

use crate::metrics;
use crate::ui::{Toast, ToastStack};

/// A frame on the alert stream: event name plus JSON payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of the `connected` acknowledgment.
#[derive(Debug, Deserialize)]
struct ConnectedAck {
    #[serde(default)]
    message: String,
}

type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type Handler = Box<dyn Fn(serde_json::Value) -> HandlerFuture + Send + Sync>;

/// Event-dispatch table for the alert stream.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<String, Handler>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event name.
    pub fn on<F, Fut>(&mut self, event: &str, handler: F)
    where
        F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.handlers
            .insert(event.to_string(), Box::new(move |data| Box::pin(handler(data))));
    }

    /// Route a frame to its handler. Returns false for unknown events,
    /// which are dropped without disturbing anything.
    pub async fn dispatch(&self, frame: StreamFrame) -> bool {
        match self.handlers.get(&frame.event) {
            Some(handler) => {
                handler(frame.data).await;
                true
            }
            None => {
                debug!(event = %frame.event, "Dropping unhandled stream event");
                false
            }
        }
    }

    pub fn handles(&self, event: &str) -> bool {
        self.handlers.contains_key(event)
    }
}

/// Shared state the alert handlers operate on.
#[derive(Clone)]
pub struct StreamContext {
    pub toasts: Arc<ToastStack>,
    pub notifier: Arc<dyn Notifier>,
    pub permission: Arc<PermissionState>,
    /// Fires an immediate unread-count refresh.
    pub refresh: mpsc::Sender<()>,
}

/// Build the dispatch table for the alerts stream.
pub fn alert_dispatcher(ctx: StreamContext) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();

    dispatcher.on("connected", |data| async move {
        match serde_json::from_value::<ConnectedAck>(data) {
            Ok(ack) => info!(message = %ack.message, "Alert stream acknowledged connection"),
            Err(e) => debug!(error = %e, "Malformed connection acknowledgment"),
        }
    });

    dispatcher.on("new_alert", move |data| {
        let ctx = ctx.clone();
        async move {
            match serde_json::from_value::<Alert>(data) {
                Ok(alert) => handle_new_alert(&ctx, alert).await,
                Err(e) => warn!(error = %e, "Malformed alert payload"),
            }
        }
    });

    dispatcher
}

/// Render an inbound alert and trigger the unread refresh.
async fn handle_new_alert(ctx: &StreamContext, alert: Alert) {
    info!(
        alert_id = alert.id,
        severity = %alert.severity,
        title = %alert.title,
        "Alert received"
    );
    metrics::record_alert_received(alert.severity);

    ctx.toasts.push(Toast::alert_banner(&alert, Instant::now()));

    if ctx.permission.is_granted() {
        let notification = OsNotification::from_alert(&alert);
        if let NotifyOutcome::Failed(e) = ctx.notifier.notify(&notification) {
            warn!(tag = %notification.tag, error = %e, "OS notification failed");
        }
    }

    // Refresh the unread count rather than incrementing locally; the badge
    // reconverges with server state at the cost of a round trip.
    if ctx.refresh.try_send(()).is_err() {
        debug!("Refresh trigger dropped; a refresh is already queued");
    }
}

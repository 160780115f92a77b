//! Common test utilities for integration tests.

// Allow dead code in this module - these are helper utilities that may not be
// used by every integration test.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use tokio::sync::mpsc;

use domain::models::{Alert, Permission, PermissionState, Severity};
use domain::services::MockNotifier;
use safehome_client::stream::{alert_dispatcher, EventDispatcher, StreamContext, StreamFrame};
use safehome_client::ui::ToastStack;

/// A stream test rig: the dispatcher plus handles on everything it mutates.
pub struct StreamRig {
    pub dispatcher: EventDispatcher,
    pub toasts: Arc<ToastStack>,
    pub notifier: Arc<MockNotifier>,
    pub permission: Arc<PermissionState>,
    pub refresh_rx: mpsc::Receiver<()>,
}

/// Build the alert dispatcher wired to mocks.
pub fn stream_rig(permission: Permission) -> StreamRig {
    let toasts = Arc::new(ToastStack::new());
    let notifier = Arc::new(MockNotifier::new());
    let permission = Arc::new(PermissionState::new(permission));
    let (refresh_tx, refresh_rx) = mpsc::channel(8);

    let dispatcher = alert_dispatcher(StreamContext {
        toasts: toasts.clone(),
        notifier: notifier.clone(),
        permission: permission.clone(),
        refresh: refresh_tx,
    });

    StreamRig {
        dispatcher,
        toasts,
        notifier,
        permission,
        refresh_rx,
    }
}

/// A sample alert with generated text.
pub fn sample_alert(id: i64, severity: Severity) -> Alert {
    Alert {
        id,
        alert_type: Some("entry".to_string()),
        severity,
        title: Sentence(2..4).fake(),
        message: Sentence(4..8).fake(),
        source: Some("front_door".to_string()),
        created_at: Utc::now(),
    }
}

/// Wrap an alert in a `new_alert` stream frame.
pub fn alert_frame(alert: &Alert) -> StreamFrame {
    StreamFrame {
        event: "new_alert".to_string(),
        data: serde_json::to_value(alert).expect("alert serializes"),
    }
}

/// A raw frame with an arbitrary event and payload.
pub fn frame(event: &str, data: serde_json::Value) -> StreamFrame {
    StreamFrame {
        event: event.to_string(),
        data,
    }
}

//! OS-level notification sink.
//!
//! Abstracts the desktop notification system so the alert-stream handler can
//! be exercised without a display server. The concrete notify-rust
//! implementation lives in the client crate.

use std::sync::Mutex;

use crate::models::{Alert, Severity};

/// Notification urgency, mapped from alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    Critical,
}

impl Urgency {
    /// Map alert severity to urgency.
    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical => Self::Critical,
            Severity::Medium | Severity::High => Self::Normal,
            Severity::Low | Severity::Unknown => Self::Low,
        }
    }
}

/// A notification handed to the OS notification system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsNotification {
    pub title: String,
    pub body: String,
    /// Deduplication tag; the OS may replace an existing notification with
    /// the same tag instead of stacking a duplicate.
    pub tag: String,
    pub urgency: Urgency,
}

impl OsNotification {
    /// Build the OS notification for a stream-delivered alert.
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            title: alert.title.clone(),
            body: alert.message.clone(),
            tag: alert.notification_tag(),
            urgency: Urgency::from_severity(alert.severity),
        }
    }
}

/// Outcome of a notification attempt.
#[derive(Debug, Clone)]
pub enum NotifyOutcome {
    /// The notification was handed to the OS.
    Shown,
    /// The notification system refused or is unavailable.
    Failed(String),
}

/// Sink for OS-level notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &OsNotification) -> NotifyOutcome;
}

/// Mock notifier recording everything it is asked to show.
#[derive(Debug, Default)]
pub struct MockNotifier {
    shown: Mutex<Vec<OsNotification>>,
    /// When set, every attempt fails.
    pub simulate_failure: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    pub fn shown(&self) -> Vec<OsNotification> {
        self.shown.lock().expect("mock lock poisoned").clone()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, notification: &OsNotification) -> NotifyOutcome {
        if self.simulate_failure {
            tracing::warn!(tag = %notification.tag, "Mock notifier simulating failure");
            return NotifyOutcome::Failed("simulated failure".to_string());
        }
        self.shown
            .lock()
            .expect("mock lock poisoned")
            .push(notification.clone());
        NotifyOutcome::Shown
    }
}

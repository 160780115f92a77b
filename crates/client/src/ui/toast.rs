//! Toast and banner view state.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use domain::models::{Alert, ColorClass, Icon, PushMessage};

/// How long a stream-delivered alert banner stays up.
pub const ALERT_BANNER_TTL: Duration = Duration::from_millis(10_000);

/// How long a foreground push toast stays up. Deliberately long so a
/// security alert is not missed.
pub const PUSH_TOAST_TTL: Duration = Duration::from_millis(60_000);

/// How long a transient status toast stays up.
pub const STATUS_TOAST_TTL: Duration = Duration::from_millis(4_000);

/// Where the entries review page lives, for call-to-action links.
const ENTRIES_REVIEW_HREF: &str = "/entries";

/// Kind of toast, for rendering decisions downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Severity-colored banner for a stream-delivered alert.
    AlertBanner,
    /// Foreground push message toast.
    PushToast,
    /// The "Enable notifications?" affordance; stays until dismissed.
    PermissionBanner,
    /// Short-lived status confirmation.
    Status,
}

/// A call-to-action link appended to a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToAction {
    pub label: String,
    pub href: String,
}

/// A single active toast.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub color: ColorClass,
    pub icon: Option<Icon>,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub action: Option<CallToAction>,
    /// None means the toast stays until explicitly dismissed.
    pub expires_at: Option<Instant>,
}

impl Toast {
    /// Banner for a stream-delivered alert; expires after 10 s.
    pub fn alert_banner(alert: &Alert, now: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ToastKind::AlertBanner,
            color: alert.severity.color_class(),
            icon: None,
            title: alert.title.clone(),
            body: format!(
                "{}\n{}",
                alert.message,
                alert.created_at.format("%H:%M:%S")
            ),
            image: None,
            action: None,
            expires_at: Some(now + ALERT_BANNER_TTL),
        }
    }

    /// Toast for a foreground push message; expires after 60 s.
    ///
    /// `action_required` appends exactly one call-to-action link to the
    /// entries review page.
    pub fn push_toast(message: &PushMessage, now: Instant) -> Self {
        let style = message.data.style();
        let action = if message.data.action_required {
            Some(CallToAction {
                label: "Review Entry".to_string(),
                href: ENTRIES_REVIEW_HREF.to_string(),
            })
        } else {
            None
        };

        Self {
            id: Uuid::new_v4(),
            kind: ToastKind::PushToast,
            color: style.color,
            icon: Some(style.icon),
            title: message
                .title
                .clone()
                .unwrap_or_else(|| "Notification".to_string()),
            body: message.body.clone().unwrap_or_default(),
            image: message.image.clone(),
            action,
            expires_at: Some(now + PUSH_TOAST_TTL),
        }
    }

    /// The permission-request banner. No expiry; dismissed explicitly.
    pub fn permission_banner() -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ToastKind::PermissionBanner,
            color: ColorClass::Info,
            icon: Some(Icon::BellFill),
            title: "Enable Notifications?".to_string(),
            body: "Get real-time alerts when someone is at your door.".to_string(),
            image: None,
            action: None,
            expires_at: None,
        }
    }

    /// Short-lived status confirmation toast.
    pub fn status(message: impl Into<String>, success: bool, now: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ToastKind::Status,
            color: if success {
                ColorClass::Success
            } else {
                ColorClass::Danger
            },
            icon: Some(if success {
                Icon::CheckCircle
            } else {
                Icon::ExclamationCircle
            }),
            title: String::new(),
            body: message.into(),
            image: None,
            action: None,
            expires_at: Some(now + STATUS_TOAST_TTL),
        }
    }
}

/// The stack of active toasts.
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a toast, returning its id for later dismissal.
    pub fn push(&self, toast: Toast) -> Uuid {
        let id = toast.id;
        self.toasts.lock().expect("toast lock poisoned").push(toast);
        id
    }

    /// Explicitly dismiss a toast. Returns false if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.toasts.lock().expect("toast lock poisoned");
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Remove every toast whose deadline has passed. Returns how many were
    /// removed.
    pub fn expire_due(&self, now: Instant) -> usize {
        let mut toasts = self.toasts.lock().expect("toast lock poisoned");
        let before = toasts.len();
        toasts.retain(|t| match t.expires_at {
            Some(deadline) => deadline > now,
            None => true,
        });
        before - toasts.len()
    }

    /// Snapshot of the active toasts.
    pub fn active(&self) -> Vec<Toast> {
        self.toasts.lock().expect("toast lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().expect("toast lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tick once a second, removing expired toasts, until shutdown.
pub fn spawn_expiry_ticker(
    stack: Arc<ToastStack>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = stack.expire_due(Instant::now());
                    if removed > 0 {
                        debug!(removed = removed, "Expired toasts removed");
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

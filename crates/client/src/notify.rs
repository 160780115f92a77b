//! Desktop notification sink backed by notify-rust.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use domain::services::{Notifier, NotifyOutcome, OsNotification, Urgency};

const APP_NAME: &str = "SafeHome";

/// OS notifier that replaces notifications sharing a tag instead of
/// stacking duplicates.
#[derive(Debug, Default)]
pub struct DesktopNotifier {
    /// tag -> platform notification id, for replace-on-redelivery.
    handles: Mutex<HashMap<String, u32>>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: &OsNotification) -> NotifyOutcome {
        let mut builder = notify_rust::Notification::new();
        builder
            .appname(APP_NAME)
            .summary(&notification.title)
            .body(&notification.body);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            builder.urgency(match notification.urgency {
                Urgency::Low => notify_rust::Urgency::Low,
                Urgency::Normal => notify_rust::Urgency::Normal,
                Urgency::Critical => notify_rust::Urgency::Critical,
            });

            if let Some(previous) = self
                .handles
                .lock()
                .expect("notifier lock poisoned")
                .get(&notification.tag)
            {
                builder.id(*previous);
            }
        }

        match builder.show() {
            Ok(handle) => {
                #[cfg(all(unix, not(target_os = "macos")))]
                self.handles
                    .lock()
                    .expect("notifier lock poisoned")
                    .insert(notification.tag.clone(), handle.id());
                #[cfg(any(not(unix), target_os = "macos"))]
                let _ = handle;

                debug!(tag = %notification.tag, "OS notification shown");
                NotifyOutcome::Shown
            }
            Err(e) => NotifyOutcome::Failed(e.to_string()),
        }
    }
}

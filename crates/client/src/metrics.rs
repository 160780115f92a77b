//! Notification pipeline metrics.
//!
//! Thin helpers over the `metrics` facade. No recorder is installed by the
//! binary; counters are no-ops unless the embedding process installs one.

use metrics::counter;

use domain::models::{PushKind, Severity};

/// Record an alert delivered over the stream.
pub fn record_alert_received(severity: Severity) {
    counter!(
        "alerts_received_total",
        "severity" => severity.as_str().to_string()
    )
    .increment(1);
}

/// Record a foreground push message.
pub fn record_push_message(kind: &PushKind) {
    counter!(
        "push_messages_total",
        "kind" => kind.as_str().to_string()
    )
    .increment(1);
}

/// Record a failed device registration.
pub fn record_registration_failure() {
    counter!("device_registration_failures_total").increment(1);
}

/// Record an unread-count poll attempt.
pub fn record_unread_poll(success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!(
        "unread_polls_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a stream reconnect attempt.
pub fn record_stream_reconnect() {
    counter!("stream_reconnects_total").increment(1);
}

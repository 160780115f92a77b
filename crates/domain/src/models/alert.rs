//! Alert domain model for server-generated security events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert severity as reported by the backend.
///
/// The wire value is an open set; anything the client does not recognize
/// deserializes to [`Severity::Unknown`] rather than failing the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl Severity {
    /// Convert to the wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }

    /// Parse from the wire string representation.
    pub fn parse(s: &str) -> Self {
        match s {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Unknown,
        }
    }

    /// Map severity to the color class used when rendering banners.
    ///
    /// The mapping is total: unrecognized severities fall back to `info`.
    pub fn color_class(&self) -> ColorClass {
        match self {
            Self::Low | Self::Unknown => ColorClass::Info,
            Self::Medium | Self::High => ColorClass::Warning,
            Self::Critical => ColorClass::Danger,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color class for toasts and banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Info,
    Warning,
    Danger,
    Success,
    Primary,
}

impl ColorClass {
    /// Convert to the presentation token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Success => "success",
            Self::Primary => "primary",
        }
    }
}

impl std::fmt::Display for ColorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Icon shown next to a toast or banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    PersonCheck,
    PersonExclamation,
    DoorOpen,
    DoorClosed,
    InfoCircle,
    CheckCircle,
    ExclamationCircle,
    BellFill,
}

impl Icon {
    /// Convert to the presentation token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonCheck => "bi-person-check",
            Self::PersonExclamation => "bi-person-exclamation",
            Self::DoorOpen => "bi-door-open",
            Self::DoorClosed => "bi-door-closed",
            Self::InfoCircle => "bi-info-circle",
            Self::CheckCircle => "bi-check-circle",
            Self::ExclamationCircle => "bi-exclamation-circle",
            Self::BellFill => "bi-bell-fill",
        }
    }
}

/// A server-generated security alert delivered over the stream or returned
/// by the unread endpoint.
///
/// Alerts are created server-side, delivered once, rendered once and never
/// mutated by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<String>,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Deduplication tag for OS-level notifications.
    pub fn notification_tag(&self) -> String {
        format!("alert-{}", self.id)
    }
}

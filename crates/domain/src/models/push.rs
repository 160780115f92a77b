//! Push message models: the wire envelope and its normalized form.
//!
//! The push transport delivers all `data` values as strings, including
//! booleans serialized as `"True"`/`"False"`. Normalization happens here,
//! at the boundary; nothing downstream sees the string form.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::alert::{ColorClass, Icon};

/// Notification block of a push message as delivered by the transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A push message exactly as it arrives on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushEnvelope {
    #[serde(default)]
    pub notification: PushNotification,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

/// Semantic subtype of a push message, taken from `data.type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushKind {
    EntryAlert,
    DoorAction,
    Other(String),
}

impl PushKind {
    /// Parse from the wire string. Absent or empty types map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "entry_alert" => Self::EntryAlert,
            "door_action" => Self::DoorAction,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::EntryAlert => "entry_alert",
            Self::DoorAction => "door_action",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for PushKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized `data` block of a push message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushData {
    pub kind: PushKind,
    pub is_known: bool,
    pub action: Option<String>,
    pub action_required: bool,
}

/// Color and icon pair selected for a push toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastStyle {
    pub color: ColorClass,
    pub icon: Icon,
}

impl PushData {
    /// Normalize the wire data map.
    ///
    /// Only the literal string `"True"` counts as true; `"true"`, `"False"`,
    /// empty strings and absent keys are all false.
    pub fn from_wire(data: &HashMap<String, String>) -> Self {
        Self {
            kind: PushKind::parse(data.get("type").map(String::as_str).unwrap_or_default()),
            is_known: wire_bool(data.get("is_known")),
            action: data.get("action").cloned(),
            action_required: wire_bool(data.get("action_required")),
        }
    }

    /// Select the color/icon pair for rendering.
    pub fn style(&self) -> ToastStyle {
        match self.kind {
            PushKind::EntryAlert => {
                if self.is_known {
                    ToastStyle {
                        color: ColorClass::Success,
                        icon: Icon::PersonCheck,
                    }
                } else {
                    ToastStyle {
                        color: ColorClass::Danger,
                        icon: Icon::PersonExclamation,
                    }
                }
            }
            PushKind::DoorAction => {
                if self.action.as_deref() == Some("door_opened") {
                    ToastStyle {
                        color: ColorClass::Success,
                        icon: Icon::DoorOpen,
                    }
                } else {
                    ToastStyle {
                        color: ColorClass::Danger,
                        icon: Icon::DoorClosed,
                    }
                }
            }
            PushKind::Other(_) => ToastStyle {
                color: ColorClass::Primary,
                icon: Icon::InfoCircle,
            },
        }
    }
}

fn wire_bool(value: Option<&String>) -> bool {
    matches!(value.map(String::as_str), Some("True"))
}

/// A push message after boundary normalization.
#[derive(Debug, Clone)]
pub struct PushMessage {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub data: PushData,
}

impl PushMessage {
    /// Normalize a wire envelope into the form consumed by rendering.
    pub fn from_wire(envelope: PushEnvelope) -> Self {
        let data = PushData::from_wire(&envelope.data);
        Self {
            title: envelope.notification.title,
            body: envelope.notification.body,
            image: envelope.notification.image,
            data,
        }
    }
}

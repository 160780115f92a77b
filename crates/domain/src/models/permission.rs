//! Notification permission state.
//!
//! One shared state per session. Only the push registration flow may move it
//! out of `Default`; every other component just reads it.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Notification permission, mirroring the platform permission model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// The user has not decided yet.
    Default,
    /// OS-level notifications may be raised.
    Granted,
    /// Terminal for the session; never re-prompt.
    Denied,
}

impl Permission {
    /// Convert to the configuration string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Parse from the configuration string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "granted" => Some(Self::Granted),
            "denied" => Some(Self::Denied),
            _ => None,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shared, interior-mutable permission state.
#[derive(Debug)]
pub struct PermissionState {
    inner: RwLock<Permission>,
}

impl PermissionState {
    pub fn new(initial: Permission) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    pub fn current(&self) -> Permission {
        *self.inner.read().expect("permission lock poisoned")
    }

    pub fn set(&self, permission: Permission) {
        *self.inner.write().expect("permission lock poisoned") = permission;
    }

    pub fn is_granted(&self) -> bool {
        self.current() == Permission::Granted
    }
}

impl Default for PermissionState {
    fn default() -> Self {
        Self::new(Permission::Default)
    }
}

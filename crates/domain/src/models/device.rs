//! Device registration model for associating this client with a push channel.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Device type reported by this client.
pub const DEVICE_TYPE_WEB: &str = "web";

/// Registration request sent once per session establishment.
///
/// The server owns persistence; the client only announces itself.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeviceRegistration {
    #[validate(length(min = 1, message = "Device token required"))]
    pub token: String,
    pub device_type: String,
    #[validate(length(max = 255, message = "Device name too long"))]
    pub device_name: String,
}

impl DeviceRegistration {
    /// Create a registration for this client.
    pub fn new(token: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            device_type: DEVICE_TYPE_WEB.to_string(),
            device_name: device_name.into(),
        }
    }
}

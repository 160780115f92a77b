//! HTTP client for the SafeHome backend.
//!
//! Implements the `BackendApi` trait over the backend's JSON endpoints:
//! the unread-alert listing and device token registration/unregistration.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use domain::models::{Alert, DeviceRegistration};
use domain::services::{BackendApi, BackendError, RegisterDeviceResponse};

use crate::config::BackendConfig;

/// Response shape of `GET /alerts/unread`.
#[derive(Debug, Deserialize)]
struct UnreadResponse {
    success: bool,
    #[serde(default)]
    alerts: Vec<Alert>,
    #[serde(default)]
    error: Option<String>,
}

/// Request body for `DELETE /notifications/unregister-device`.
#[derive(Debug, Serialize)]
struct UnregisterRequest<'a> {
    token: &'a str,
}

/// Response shape of the unregister endpoint.
#[derive(Debug, Deserialize)]
struct UnregisterResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Backend HTTP client.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl BackendApi for BackendClient {
    async fn unread_alerts(&self) -> Result<Vec<Alert>, BackendError> {
        let url = self.url("/alerts/unread");
        debug!(url = %url, "Fetching unread alerts");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let body: UnreadResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        if !body.success {
            return Err(BackendError::Rejected(
                body.error.unwrap_or_else(|| "unread fetch failed".to_string()),
            ));
        }

        Ok(body.alerts)
    }

    async fn register_device(
        &self,
        registration: &DeviceRegistration,
    ) -> Result<RegisterDeviceResponse, BackendError> {
        let url = self.url("/notifications/register-device");

        let response = self
            .client
            .post(&url)
            .json(registration)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let body: RegisterDeviceResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        if !body.success {
            return Err(BackendError::Rejected(
                body.message
                    .unwrap_or_else(|| "registration failed".to_string()),
            ));
        }

        Ok(body)
    }

    async fn unregister_device(&self, token: &str) -> Result<(), BackendError> {
        let url = self.url("/notifications/unregister-device");

        let response = self
            .client
            .delete(&url)
            .json(&UnregisterRequest { token })
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let body: UnregisterResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        if !body.success {
            return Err(BackendError::Rejected(
                body.message
                    .unwrap_or_else(|| "unregistration failed".to_string()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    fn test_backend_config(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            request_timeout_ms: 5000,
        }
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = BackendClient::new(&test_backend_config("http://host:5000/")).unwrap();
        assert_eq!(client.url("/alerts/unread"), "http://host:5000/alerts/unread");
    }

    #[test]
    fn test_unread_response_deserialization() {
        let json = r#"{
            "success": true,
            "alerts": [{
                "id": 1,
                "type": "entry",
                "severity": "medium",
                "title": "t",
                "message": "m",
                "source": "cam",
                "created_at": "2024-05-01T12:30:00Z"
            }]
        }"#;
        let body: UnreadResponse = serde_json::from_str(json).unwrap();
        assert!(body.success);
        assert_eq!(body.alerts.len(), 1);
    }

    #[test]
    fn test_unread_response_defaults() {
        let body: UnreadResponse =
            serde_json::from_str(r#"{"success": false, "error": "nope"}"#).unwrap();
        assert!(!body.success);
        assert!(body.alerts.is_empty());
        assert_eq!(body.error.as_deref(), Some("nope"));
    }

    #[test]
    fn test_register_response_deserialization() {
        let body: RegisterDeviceResponse = serde_json::from_str(
            r#"{"success": true, "message": "Device token registered successfully", "device_id": 12}"#,
        )
        .unwrap();
        assert!(body.success);
        assert_eq!(body.device_id, Some(12));
    }
}

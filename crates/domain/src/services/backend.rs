//! Backend API abstraction.
//!
//! The client consumes three backend operations: the unread-alert listing,
//! device registration and device unregistration. The trait keeps the flows
//! testable without a live server; the HTTP implementation lives in the
//! client crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::models::{Alert, DeviceRegistration};

/// Errors surfaced by backend operations.
///
/// All of them are non-fatal to the client; callers log and degrade.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Response to a device registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDeviceResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Backend operations consumed by the notification pipeline.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// Fetch the current unread alerts.
    async fn unread_alerts(&self) -> Result<Vec<Alert>, BackendError>;

    /// Register a device token for push delivery.
    async fn register_device(
        &self,
        registration: &DeviceRegistration,
    ) -> Result<RegisterDeviceResponse, BackendError>;

    /// Unregister a previously registered device token.
    async fn unregister_device(&self, token: &str) -> Result<(), BackendError>;
}

/// Mock backend for development and testing.
///
/// Records every call so tests can assert call counts and payloads.
#[derive(Debug, Default)]
pub struct MockBackend {
    unread: Mutex<Vec<Alert>>,
    registrations: Mutex<Vec<DeviceRegistration>>,
    unregistered: Mutex<Vec<String>>,
    unread_calls: AtomicUsize,
    /// When set, registration responds with `{success: false}`.
    pub reject_registration: bool,
    /// When set, every operation fails with a transport error.
    pub simulate_transport_failure: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose registration endpoint answers `{success: false}`.
    pub fn rejecting() -> Self {
        Self {
            reject_registration: true,
            ..Self::default()
        }
    }

    /// A mock that simulates network failures on every call.
    pub fn failing() -> Self {
        Self {
            simulate_transport_failure: true,
            ..Self::default()
        }
    }

    /// Replace the unread alerts the mock serves.
    pub fn set_unread(&self, alerts: Vec<Alert>) {
        *self.unread.lock().expect("mock lock poisoned") = alerts;
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.lock().expect("mock lock poisoned").len()
    }

    pub fn registrations(&self) -> Vec<DeviceRegistration> {
        self.registrations
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }

    pub fn unregistered_tokens(&self) -> Vec<String> {
        self.unregistered.lock().expect("mock lock poisoned").clone()
    }

    pub fn unread_call_count(&self) -> usize {
        self.unread_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BackendApi for MockBackend {
    async fn unread_alerts(&self) -> Result<Vec<Alert>, BackendError> {
        self.unread_calls.fetch_add(1, Ordering::SeqCst);
        if self.simulate_transport_failure {
            return Err(BackendError::Transport("simulated failure".to_string()));
        }
        Ok(self.unread.lock().expect("mock lock poisoned").clone())
    }

    async fn register_device(
        &self,
        registration: &DeviceRegistration,
    ) -> Result<RegisterDeviceResponse, BackendError> {
        self.registrations
            .lock()
            .expect("mock lock poisoned")
            .push(registration.clone());

        if self.simulate_transport_failure {
            return Err(BackendError::Transport("simulated failure".to_string()));
        }
        if self.reject_registration {
            return Err(BackendError::Rejected("Device token required".to_string()));
        }

        tracing::info!(
            token = %registration.token,
            device_type = %registration.device_type,
            "Mock: device registered"
        );

        Ok(RegisterDeviceResponse {
            success: true,
            device_id: Some(1),
            message: Some("Device token registered successfully".to_string()),
        })
    }

    async fn unregister_device(&self, token: &str) -> Result<(), BackendError> {
        self.unregistered
            .lock()
            .expect("mock lock poisoned")
            .push(token.to_string());

        if self.simulate_transport_failure {
            return Err(BackendError::Transport("simulated failure".to_string()));
        }
        Ok(())
    }
}

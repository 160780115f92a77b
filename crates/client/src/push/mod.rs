//! Push registration client.
//!
//! Owns the notification permission flow for the whole session: negotiates
//! the user's decision, obtains a messaging token, registers it with the
//! backend and hands the foreground message stream to the renderer. Every
//! failure here degrades silently; push is a best-effort affordance layered
//! over a client that works without it.

pub mod foreground;
pub mod gateway;
pub mod prompt;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};
use validator::Validate;

use domain::models::{DeviceRegistration, Permission, PermissionState, PushEnvelope};
use domain::services::{BackendApi, PermissionPrompt, PushTransport};

use crate::metrics;
use crate::ui::{Toast, ToastStack};

/// An initialized messaging session: the registered token and the
/// foreground message stream.
pub struct MessagingSession {
    pub token: String,
    pub messages: mpsc::Receiver<PushEnvelope>,
}

/// Drives permission negotiation and device registration.
pub struct PushRegistrar {
    transport: Arc<dyn PushTransport>,
    backend: Arc<dyn BackendApi>,
    prompt: Arc<dyn PermissionPrompt>,
    permission: Arc<PermissionState>,
    toasts: Arc<ToastStack>,
    device_name: String,
}

impl PushRegistrar {
    pub fn new(
        transport: Arc<dyn PushTransport>,
        backend: Arc<dyn BackendApi>,
        prompt: Arc<dyn PermissionPrompt>,
        permission: Arc<PermissionState>,
        toasts: Arc<ToastStack>,
        device_name: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            backend,
            prompt,
            permission,
            toasts,
            device_name: device_name.into(),
        }
    }

    /// Run the permission flow and, when granted, initialize messaging.
    ///
    /// Returns None whenever the flow ends without an active subscription:
    /// permission denied or undecided, no token issued, or the transport
    /// failed. None is never an error.
    pub async fn run(&self) -> Option<MessagingSession> {
        match self.permission.current() {
            Permission::Granted => {}
            Permission::Denied => {
                info!("Notification permission denied; push disabled for this session");
                return None;
            }
            Permission::Default => {
                // Explicit affordance first; the prompt never fires on its own.
                let banner_id = self.toasts.push(Toast::permission_banner());
                let decision = self.prompt.request().await;
                self.toasts.dismiss(banner_id);

                match decision {
                    Permission::Granted => {
                        self.permission.set(Permission::Granted);
                        self.toasts.push(Toast::status(
                            "Notifications enabled!",
                            true,
                            std::time::Instant::now(),
                        ));
                    }
                    Permission::Denied => {
                        self.permission.set(Permission::Denied);
                        warn!("Notification permission denied");
                        return None;
                    }
                    Permission::Default => {
                        // Banner dismissed without a decision; stay quiet,
                        // do not re-prompt this session.
                        info!("Notification permission request dismissed");
                        return None;
                    }
                }
            }
        }

        self.initialize_messaging().await
    }

    async fn initialize_messaging(&self) -> Option<MessagingSession> {
        let token = match self.transport.fetch_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("No registration token available");
                return None;
            }
            Err(e) => {
                error!(error = %e, "Push messaging initialization failed");
                return None;
            }
        };

        self.register_token(&token).await;

        match self.transport.subscribe(&token).await {
            Ok(messages) => Some(MessagingSession { token, messages }),
            Err(e) => {
                error!(error = %e, "Push message subscription failed");
                None
            }
        }
    }

    /// Register the token with the backend: exactly one POST, and failures
    /// never propagate. Until the flow reruns on the next session, a failed
    /// registration simply means no server-targeted pushes.
    pub async fn register_token(&self, token: &str) {
        let registration = DeviceRegistration::new(token, self.device_name.clone());
        if let Err(e) = registration.validate() {
            warn!(error = %e, "Invalid device registration");
            return;
        }

        match self.backend.register_device(&registration).await {
            Ok(response) => {
                info!(device_id = ?response.device_id, "Device token registered");
            }
            Err(e) => {
                metrics::record_registration_failure();
                error!(error = %e, "Token registration failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::{MockBackend, MockPrompt, MockPushTransport};

    fn registrar(
        transport: MockPushTransport,
        backend: Arc<MockBackend>,
        prompt: MockPrompt,
        permission: Permission,
    ) -> (PushRegistrar, Arc<ToastStack>, Arc<PermissionState>) {
        let toasts = Arc::new(ToastStack::new());
        let state = Arc::new(PermissionState::new(permission));
        let registrar = PushRegistrar::new(
            Arc::new(transport),
            backend,
            Arc::new(prompt),
            state.clone(),
            toasts.clone(),
            "safehome-client/test",
        );
        (registrar, toasts, state)
    }

    #[tokio::test]
    async fn test_denied_permission_is_terminal() {
        let backend = Arc::new(MockBackend::new());
        let (registrar, toasts, _) = registrar(
            MockPushTransport::with_token("tok"),
            backend.clone(),
            MockPrompt::granting(),
            Permission::Denied,
        );

        assert!(registrar.run().await.is_none());
        assert_eq!(backend.registration_count(), 0);
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_dismissed_banner_leaves_permission_default() {
        let backend = Arc::new(MockBackend::new());
        let (registrar, toasts, state) = registrar(
            MockPushTransport::with_token("tok"),
            backend.clone(),
            MockPrompt::dismissing(),
            Permission::Default,
        );

        assert!(registrar.run().await.is_none());
        assert_eq!(state.current(), Permission::Default);
        assert_eq!(backend.registration_count(), 0);
        // Banner was rendered, then dismissed with the prompt.
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_empty_token_is_not_registered() {
        let backend = Arc::new(MockBackend::new());
        let (registrar, _, _) = registrar(
            MockPushTransport::with_token(""),
            backend.clone(),
            MockPrompt::granting(),
            Permission::Granted,
        );

        // The transport issued an empty token; validation stops the POST.
        let session = registrar.run().await;
        assert!(session.is_some());
        assert_eq!(backend.registration_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_registration_is_not_retried() {
        let backend = Arc::new(MockBackend::rejecting());
        let (registrar, _, _) = registrar(
            MockPushTransport::with_token("tok"),
            backend.clone(),
            MockPrompt::granting(),
            Permission::Granted,
        );

        let session = registrar.run().await;
        // Registration failed silently; the subscription still proceeds.
        assert!(session.is_some());
        assert_eq!(backend.registration_count(), 1);
    }
}

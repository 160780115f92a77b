//! Application wiring: builds the shared view state, connects the
//! components and owns graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use domain::models::PermissionState;
use domain::services::{BackendApi, Notifier, PermissionPrompt, PushTransport};

use crate::api::BackendClient;
use crate::config::Config;
use crate::jobs::{JobScheduler, UnreadPollJob};
use crate::notify::DesktopNotifier;
use crate::push::foreground::spawn_foreground_handler;
use crate::push::gateway::PushGateway;
use crate::push::prompt::ConsolePrompt;
use crate::push::PushRegistrar;
use crate::stream::transport::StreamRunner;
use crate::stream::{alert_dispatcher, StreamContext};
use crate::ui::toast::spawn_expiry_ticker;
use crate::ui::{ToastStack, UnreadBadge};

/// How long shutdown waits for background tasks.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Buffered refresh triggers; one pending refresh is enough.
const REFRESH_BUFFER: usize = 8;

/// The running client.
pub struct App {
    shutdown_tx: watch::Sender<bool>,
    scheduler: JobScheduler,
    handles: Vec<JoinHandle<()>>,
    toasts: Arc<ToastStack>,
    badge: Arc<UnreadBadge>,
}

impl App {
    /// Build the shared state and spawn every component.
    pub fn start(config: Config) -> anyhow::Result<Self> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let toasts = Arc::new(ToastStack::new());
        let badge = Arc::new(UnreadBadge::new());
        let permission = Arc::new(PermissionState::new(config.initial_permission()));
        let backend: Arc<dyn BackendApi> = Arc::new(BackendClient::new(&config.backend)?);
        let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new());

        let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_BUFFER);

        // Unread poller: at startup, every 30 s, and on every stream alert.
        let mut scheduler = JobScheduler::new();
        scheduler.register_with_trigger(
            UnreadPollJob::new(backend.clone(), badge.clone()),
            refresh_rx,
        );
        scheduler.start();

        let mut handles = Vec::new();
        handles.push(spawn_expiry_ticker(toasts.clone(), shutdown_rx.clone()));

        // Alert stream.
        let ctx = StreamContext {
            toasts: toasts.clone(),
            notifier,
            permission: permission.clone(),
            refresh: refresh_tx,
        };
        handles.push(StreamRunner::new(&config.stream, alert_dispatcher(ctx)).spawn(shutdown_rx.clone()));

        // Push registration and foreground rendering.
        if config.push.enabled {
            let transport: Arc<dyn PushTransport> = Arc::new(PushGateway::new(&config.push)?);
            let prompt: Arc<dyn PermissionPrompt> = Arc::new(ConsolePrompt::new());
            let registrar = PushRegistrar::new(
                transport,
                backend.clone(),
                prompt,
                permission,
                toasts.clone(),
                config.push.device_name.clone(),
            );

            let push_backend = backend;
            let push_toasts = toasts.clone();
            let push_shutdown = shutdown_rx;
            handles.push(tokio::spawn(async move {
                let Some(session) = registrar.run().await else {
                    return;
                };
                let token = session.token.clone();

                let handler =
                    spawn_foreground_handler(session.messages, push_toasts, push_shutdown);
                let _ = handler.await;

                // Session over: release the registration so the backend
                // stops targeting this device.
                match push_backend.unregister_device(&token).await {
                    Ok(()) => info!("Device token unregistered"),
                    Err(e) => warn!(error = %e, "Device token unregistration failed"),
                }
            }));
        } else {
            info!("Push messaging disabled by configuration");
        }

        Ok(Self {
            shutdown_tx,
            scheduler,
            handles,
            toasts,
            badge,
        })
    }

    /// The toast stack, for embedding frontends.
    pub fn toasts(&self) -> Arc<ToastStack> {
        self.toasts.clone()
    }

    /// The unread badge, for embedding frontends.
    pub fn badge(&self) -> Arc<UnreadBadge> {
        self.badge.clone()
    }

    /// Signal every task and wait for them to finish.
    pub async fn shutdown(self, timeout: Duration) {
        let _ = self.shutdown_tx.send(true);

        self.scheduler.shutdown();
        self.scheduler.wait_for_shutdown(timeout).await;

        let join_all = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Task panicked: {}", e);
                }
            }
        };
        if tokio::time::timeout(timeout, join_all).await.is_err() {
            warn!("Background tasks did not stop within {:?}", timeout);
        }
    }
}

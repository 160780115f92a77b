//! Service traits and mock implementations.

pub mod backend;
pub mod notifier;
pub mod prompt;
pub mod push_transport;

pub use backend::{BackendApi, BackendError, MockBackend, RegisterDeviceResponse};
pub use notifier::{MockNotifier, Notifier, NotifyOutcome, OsNotification, Urgency};
pub use prompt::{MockPrompt, PermissionPrompt};
pub use push_transport::{MockPushTransport, PushTransport, PushTransportError};

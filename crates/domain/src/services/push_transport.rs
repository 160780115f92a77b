//! Push messaging transport abstraction.
//!
//! Covers the two platform interactions the registration flow needs: token
//! acquisition and the foreground message stream. The gateway-backed
//! implementation lives in the client crate.

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::models::PushEnvelope;

/// Errors surfaced by the push transport.
#[derive(Debug, thiserror::Error)]
pub enum PushTransportError {
    #[error("gateway request failed: {0}")]
    Transport(String),

    #[error("gateway rejected the request: {0}")]
    Gateway(String),
}

/// Platform push service operations.
#[async_trait::async_trait]
pub trait PushTransport: Send + Sync {
    /// Obtain a messaging token.
    ///
    /// `Ok(None)` means the service is reachable but issued no token; the
    /// caller logs and stops, it is not an error.
    async fn fetch_token(&self) -> Result<Option<String>, PushTransportError>;

    /// Subscribe to messages delivered while the client is foregrounded.
    ///
    /// The returned channel closes when the subscription ends.
    async fn subscribe(
        &self,
        token: &str,
    ) -> Result<mpsc::Receiver<PushEnvelope>, PushTransportError>;
}

/// Mock transport serving a preset token and scripted messages.
#[derive(Debug, Default)]
pub struct MockPushTransport {
    token: Option<String>,
    messages: Mutex<Vec<PushEnvelope>>,
    /// When set, `fetch_token` fails with a transport error.
    pub simulate_failure: bool,
}

impl MockPushTransport {
    /// A transport that issues the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// A transport that issues no token.
    pub fn without_token() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Queue messages to be delivered on the next `subscribe` call.
    pub fn queue_message(&self, envelope: PushEnvelope) {
        self.messages
            .lock()
            .expect("mock lock poisoned")
            .push(envelope);
    }
}

#[async_trait::async_trait]
impl PushTransport for MockPushTransport {
    async fn fetch_token(&self) -> Result<Option<String>, PushTransportError> {
        if self.simulate_failure {
            return Err(PushTransportError::Transport(
                "simulated failure".to_string(),
            ));
        }
        Ok(self.token.clone())
    }

    async fn subscribe(
        &self,
        _token: &str,
    ) -> Result<mpsc::Receiver<PushEnvelope>, PushTransportError> {
        let queued: Vec<PushEnvelope> =
            self.messages.lock().expect("mock lock poisoned").drain(..).collect();
        let (tx, rx) = mpsc::channel(queued.len().max(1));
        for envelope in queued {
            let _ = tx.send(envelope).await;
        }
        // Dropping the sender closes the stream once queued messages drain.
        Ok(rx)
    }
}

//! Push gateway client.
//!
//! Client side of the platform push service: token acquisition over HTTP
//! and the foreground message stream over WebSocket.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tracing::{debug, info, warn};

use domain::models::PushEnvelope;
use domain::services::{PushTransport, PushTransportError};

use crate::config::PushConfig;

/// Gateway request timeout.
const GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Buffered foreground messages before backpressure.
const MESSAGE_BUFFER: usize = 16;

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    vapid_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

/// HTTP + WebSocket client for the push gateway.
pub struct PushGateway {
    client: Client,
    gateway_url: String,
    vapid_key: String,
}

impl PushGateway {
    /// Create a new gateway client.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &PushConfig) -> Result<Self, PushTransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(GATEWAY_TIMEOUT_SECS))
            .build()
            .map_err(|e| PushTransportError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            vapid_key: config.vapid_key.clone(),
        })
    }
}

/// Derive the stream URL from the gateway base URL.
fn stream_url(gateway_url: &str, token: &str) -> String {
    let ws_base = if let Some(rest) = gateway_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = gateway_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        gateway_url.to_string()
    };
    format!("{}/stream?token={}", ws_base, token)
}

#[async_trait::async_trait]
impl PushTransport for PushGateway {
    async fn fetch_token(&self) -> Result<Option<String>, PushTransportError> {
        let url = format!("{}/token", self.gateway_url);

        let response = self
            .client
            .post(&url)
            .json(&TokenRequest {
                vapid_key: &self.vapid_key,
            })
            .send()
            .await
            .map_err(|e| PushTransportError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PushTransportError::Gateway(format!(
                "token request returned {}: {}",
                status, body
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| PushTransportError::Transport(e.to_string()))?;

        Ok(body.token)
    }

    async fn subscribe(
        &self,
        token: &str,
    ) -> Result<mpsc::Receiver<PushEnvelope>, PushTransportError> {
        let url = stream_url(&self.gateway_url, token);

        let (mut ws, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| PushTransportError::Transport(e.to_string()))?;
        info!("Subscribed to push message stream");

        let (tx, rx) = mpsc::channel(MESSAGE_BUFFER);

        tokio::spawn(async move {
            while let Some(message) = ws.next().await {
                match message {
                    Ok(WsMessage::Text(text)) => match serde_json::from_str(&text) {
                        Ok(envelope) => {
                            if tx.send(envelope).await.is_err() {
                                // Receiver gone; the session ended.
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "Malformed push message"),
                    },
                    Ok(WsMessage::Close(_)) => {
                        info!("Push message stream closed by gateway");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "Push message stream error");
                        break;
                    }
                }
            }
            debug!("Push message stream ended");
        });

        Ok(rx)
    }
}

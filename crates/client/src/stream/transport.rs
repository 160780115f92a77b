//! WebSocket transport for the alert stream.
//!
//! Owns connection lifecycle and retry. Dispatch logic never sees
//! reconnects; it only receives parsed frames.

use std::time::Duration;

use futures_util::StreamExt;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tracing::{debug, info, warn};

use crate::config::StreamConfig;
use crate::metrics;

use super::EventDispatcher;

/// First retry delay after a failed or dropped connection.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Upper bound on the random jitter added to each retry delay.
const BACKOFF_JITTER_MS: u64 = 500;

/// Double the backoff, clamped to the configured maximum.
fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

/// Long-lived alert stream runner.
pub struct StreamRunner {
    url: String,
    dispatcher: EventDispatcher,
    max_backoff: Duration,
}

impl StreamRunner {
    pub fn new(config: &StreamConfig, dispatcher: EventDispatcher) -> Self {
        Self {
            url: config.url.clone(),
            dispatcher,
            max_backoff: Duration::from_secs(config.reconnect_max_backoff_secs),
        }
    }

    /// Spawn the connect/read/retry loop until shutdown.
    pub fn spawn(self, mut shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut backoff = INITIAL_BACKOFF;

            loop {
                if *shutdown_rx.borrow() {
                    break;
                }

                match connect_async(self.url.as_str()).await {
                    Ok((mut ws, _response)) => {
                        info!(url = %self.url, "Connected to alert stream");
                        backoff = INITIAL_BACKOFF;

                        loop {
                            tokio::select! {
                                message = ws.next() => match message {
                                    Some(Ok(WsMessage::Text(text))) => {
                                        match serde_json::from_str(&text) {
                                            Ok(frame) => {
                                                self.dispatcher.dispatch(frame).await;
                                            }
                                            Err(e) => {
                                                warn!(error = %e, "Malformed stream frame");
                                            }
                                        }
                                    }
                                    Some(Ok(WsMessage::Close(_))) => {
                                        info!("Alert stream closed by server");
                                        break;
                                    }
                                    Some(Ok(_)) => {}
                                    Some(Err(e)) => {
                                        warn!(error = %e, "Alert stream receive error");
                                        break;
                                    }
                                    None => {
                                        info!("Disconnected from alert stream");
                                        break;
                                    }
                                },
                                _ = shutdown_rx.changed() => {
                                    if *shutdown_rx.borrow() {
                                        return;
                                    }
                                }
                            }
                        }
                    }
                    Err(e) => {
                        warn!(url = %self.url, error = %e, "Alert stream connect failed");
                    }
                }

                metrics::record_stream_reconnect();
                let jitter = Duration::from_millis(
                    rand::thread_rng().gen_range(0..BACKOFF_JITTER_MS),
                );
                let wait = backoff + jitter;
                debug!(wait_ms = wait.as_millis() as u64, "Reconnecting after backoff");

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }

                backoff = next_backoff(backoff, self.max_backoff);
            }
        })
    }
}

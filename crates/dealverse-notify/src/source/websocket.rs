//! WebSocket push source with automatic reconnect.

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use rand::RngExt;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};

use dealverse_core::config::SourceConfig;
use dealverse_core::error::AppError;
use dealverse_core::result::AppResult;

use super::{ConnectionStatus, EventSource, PushMessage, SourceEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How a connected session ended.
enum SessionEnd {
    /// Shutdown was signalled or the engine went away.
    Stop,
    /// The connection dropped; schedule a reconnect.
    Reconnect,
}

/// Long-lived WebSocket connection to the notification push channel.
///
/// Reconnects with exponential backoff and jitter when the connection
/// drops. Unrecognized messages are logged and skipped so a newer server
/// cannot wedge an older client.
#[derive(Debug)]
pub struct WsNotificationSource {
    config: SourceConfig,
}

impl WsNotificationSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    /// Forward an event to the engine. Returns `false` once the engine
    /// side of the channel is gone.
    async fn emit(&self, events: &mpsc::Sender<SourceEvent>, event: SourceEvent) -> bool {
        events.send(event).await.is_ok()
    }

    /// Compute the wait before the next attempt and the doubled delay
    /// for the one after, capped at the configured maximum.
    fn backoff_delay(&self, current_ms: u64) -> (Duration, u64) {
        let next_ms = (current_ms * 2).min(self.config.reconnect_max_ms);
        let jitter = rand::rng().random_range(0..=current_ms / 4);
        (Duration::from_millis(current_ms + jitter), next_ms)
    }

    /// Pump one connected session until shutdown or disconnect.
    async fn run_session(
        &self,
        mut stream: WsStream,
        events: &mpsc::Sender<SourceEvent>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> SessionEnd {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        let _ = stream.send(Message::Close(None)).await;
                        return SessionEnd::Stop;
                    }
                }
                message = stream.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            if !self.handle_text(text.as_str(), events).await {
                                return SessionEnd::Stop;
                            }
                        }
                        Some(Ok(Message::Ping(payload))) => {
                            if let Err(e) = stream.send(Message::Pong(payload)).await {
                                warn!(error = %e, "Failed to answer ping");
                                return SessionEnd::Reconnect;
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "Server closed the notification channel");
                            return SessionEnd::Reconnect;
                        }
                        Some(Ok(_)) => {
                            // Binary, pong and raw frames carry nothing for us.
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "Notification channel error");
                            return SessionEnd::Reconnect;
                        }
                        None => {
                            debug!("Notification channel stream ended");
                            return SessionEnd::Reconnect;
                        }
                    }
                }
            }
        }
    }

    /// Decode one text frame and forward it. Returns `false` once the
    /// engine side of the channel is gone.
    async fn handle_text(&self, text: &str, events: &mpsc::Sender<SourceEvent>) -> bool {
        let message = match serde_json::from_str::<PushMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Dropping unrecognized push message");
                return true;
            }
        };
        match message {
            PushMessage::Notification { notification } => {
                self.emit(events, SourceEvent::Notification(notification)).await
            }
            PushMessage::Activity { activity } => {
                self.emit(events, SourceEvent::Activity(activity)).await
            }
            PushMessage::Ping { timestamp } => {
                trace!(%timestamp, "Server keepalive");
                true
            }
        }
    }
}

#[async_trait]
impl EventSource for WsNotificationSource {
    fn source_type(&self) -> &'static str {
        "websocket"
    }

    async fn run(
        &self,
        events: mpsc::Sender<SourceEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> AppResult<()> {
        let mut attempt: u32 = 0;
        let mut delay_ms = self.config.reconnect_initial_ms;

        loop {
            if *shutdown.borrow() {
                break;
            }

            let status = if attempt == 0 {
                ConnectionStatus::Connecting
            } else {
                ConnectionStatus::Reconnecting { attempt }
            };
            if !self.emit(&events, SourceEvent::Status(status)).await {
                return Ok(());
            }

            match connect_async(self.config.url.as_str()).await {
                Ok((stream, _response)) => {
                    info!(url = %self.config.url, "Notification channel connected");
                    attempt = 0;
                    delay_ms = self.config.reconnect_initial_ms;
                    if !self
                        .emit(&events, SourceEvent::Status(ConnectionStatus::Connected))
                        .await
                    {
                        return Ok(());
                    }
                    match self.run_session(stream, &events, &mut shutdown).await {
                        SessionEnd::Stop => break,
                        SessionEnd::Reconnect => {}
                    }
                }
                Err(e) => {
                    warn!(error = %e, url = %self.config.url, "Notification channel connect failed");
                }
            }

            attempt += 1;
            if self.config.max_reconnect_attempts > 0
                && attempt > self.config.max_reconnect_attempts
            {
                let _ = self
                    .emit(&events, SourceEvent::Status(ConnectionStatus::Disconnected))
                    .await;
                return Err(AppError::source_channel(format!(
                    "notification channel unavailable after {} attempts",
                    self.config.max_reconnect_attempts
                )));
            }

            let (wait, next_ms) = self.backoff_delay(delay_ms);
            delay_ms = next_ms;
            debug!(attempt, wait_ms = wait.as_millis() as u64, "Scheduling reconnect");
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let _ = self
            .emit(&events, SourceEvent::Status(ConnectionStatus::Disconnected))
            .await;
        Ok(())
    }
}

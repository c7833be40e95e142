//! Push-event sources feeding the notification engine.

mod websocket;

pub use websocket::WsNotificationSource;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use dealverse_core::result::AppResult;
use dealverse_entity::activity::ActivityEntry;
use dealverse_entity::notification::LiveNotification;

/// Connection state of a push-event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Initial connection attempt in progress.
    Connecting,
    /// Connected and receiving events.
    Connected,
    /// Connection lost; retrying with backoff.
    Reconnecting {
        /// Consecutive failed attempts so far.
        attempt: u32,
    },
    /// No connection and no further attempts scheduled.
    Disconnected,
}

/// Messages the server pushes over the notification channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PushMessage {
    /// A notification for the current user.
    Notification {
        /// The full notification payload.
        notification: LiveNotification,
    },
    /// A workspace activity entry.
    Activity {
        /// The activity record.
        activity: ActivityEntry,
    },
    /// Application-level keepalive from the server.
    Ping {
        /// Server time the ping was sent.
        timestamp: DateTime<Utc>,
    },
}

/// Decoded event emitted by a source toward the engine.
#[derive(Debug, Clone)]
pub enum SourceEvent {
    /// A notification arrived.
    Notification(LiveNotification),
    /// An activity entry arrived.
    Activity(ActivityEntry),
    /// The source's connection state changed.
    Status(ConnectionStatus),
}

/// A long-running producer of notification and activity events.
#[async_trait]
pub trait EventSource: Send + Sync + std::fmt::Debug + 'static {
    /// Short identifier used in logs.
    fn source_type(&self) -> &'static str;

    /// Run until shutdown is signalled, forwarding decoded events to `events`.
    ///
    /// Returns an error only when the source gives up permanently, e.g.
    /// after exhausting its reconnect budget.
    async fn run(
        &self,
        events: mpsc::Sender<SourceEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> AppResult<()>;
}

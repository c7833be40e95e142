//! Backend API contract for the notification pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use dealverse_core::result::AppResult;
use dealverse_core::types::NotificationId;
use dealverse_entity::notification::{LiveNotification, NotificationPreferences};

/// Success envelope wrapping every 2xx response body: `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// The payload.
    pub data: T,
}

/// Error payload carried inside [`ErrorEnvelope`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Error envelope returned on non-2xx: `{"error": {"code", "message"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error payload.
    pub error: ApiErrorBody,
}

/// Trait for the notification backend API.
///
/// Every mutating call is fire-and-confirm: the engine updates local
/// state first and treats a backend failure as a sync problem to report,
/// not a reason to roll back.
#[async_trait]
pub trait NotificationBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "http", "memory").
    fn backend_type(&self) -> &str;

    /// Fetch the most recent notifications, newest first.
    async fn fetch_notifications(&self, limit: usize) -> AppResult<Vec<LiveNotification>>;

    /// Fetch the current user's notification preferences.
    async fn fetch_preferences(&self) -> AppResult<NotificationPreferences>;

    /// Persist the full preference record.
    async fn save_preferences(&self, preferences: &NotificationPreferences) -> AppResult<()>;

    /// Mark one notification as read.
    async fn mark_read(&self, id: NotificationId) -> AppResult<()>;

    /// Mark every notification as read.
    async fn mark_all_read(&self) -> AppResult<()>;

    /// Dismiss one notification.
    async fn dismiss(&self, id: NotificationId) -> AppResult<()>;

    /// Dismiss every active notification.
    async fn dismiss_all(&self) -> AppResult<()>;

    /// Run the backend side effect behind a notification action.
    async fn execute_action(&self, id: NotificationId, action_id: &str) -> AppResult<()>;
}

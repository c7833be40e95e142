//! HTTP implementation of the backend API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use dealverse_core::config::BackendConfig;
use dealverse_core::error::{AppError, ErrorKind};
use dealverse_core::result::AppResult;
use dealverse_core::types::NotificationId;
use dealverse_entity::notification::{LiveNotification, NotificationPreferences};

use crate::api::{DataEnvelope, ErrorEnvelope, NotificationBackend};

/// REST client for the DealVerse backend notification endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpBackend {
    /// Build a client from backend configuration.
    pub fn from_config(config: &BackendConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Backend, "Backend request failed", e))?;
        Self::check_status(response).await
    }

    /// Turn a non-2xx response into an [`AppError`], preferring the
    /// backend's `{error: {code, message}}` body over the bare status.
    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("Backend returned {status}"),
        };
        if status == StatusCode::NOT_FOUND {
            Err(AppError::not_found(message))
        } else {
            Err(AppError::backend(message))
        }
    }
}

#[async_trait]
impl NotificationBackend for HttpBackend {
    fn backend_type(&self) -> &str {
        "http"
    }

    async fn fetch_notifications(&self, limit: usize) -> AppResult<Vec<LiveNotification>> {
        let response = self
            .send(
                self.request(Method::GET, "notifications")
                    .query(&[("limit", limit)]),
            )
            .await?;
        // Decode item by item: one malformed record (unknown category,
        // unknown priority) must not discard the whole page.
        let envelope: DataEnvelope<Vec<serde_json::Value>> =
            response.json().await.map_err(|e| {
                AppError::with_source(ErrorKind::Serialization, "Invalid notification page", e)
            })?;
        let raw = envelope.data;
        let total = raw.len();
        let mut notifications = Vec::with_capacity(total);
        for value in raw {
            match serde_json::from_value::<LiveNotification>(value) {
                Ok(notification) => notifications.push(notification),
                Err(e) => warn!(error = %e, "Dropping malformed notification record"),
            }
        }
        debug!(
            fetched = notifications.len(),
            dropped = total - notifications.len(),
            "Fetched notification page"
        );
        Ok(notifications)
    }

    async fn fetch_preferences(&self) -> AppResult<NotificationPreferences> {
        let response = self
            .send(self.request(Method::GET, "notifications/preferences"))
            .await?;
        let envelope: DataEnvelope<NotificationPreferences> =
            response.json().await.map_err(|e| {
                AppError::with_source(ErrorKind::Serialization, "Invalid preference payload", e)
            })?;
        Ok(envelope.data)
    }

    async fn save_preferences(&self, preferences: &NotificationPreferences) -> AppResult<()> {
        self.send(
            self.request(Method::PUT, "notifications/preferences")
                .json(preferences),
        )
        .await?;
        Ok(())
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        self.send(self.request(Method::POST, &format!("notifications/{id}/read")))
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        self.send(self.request(Method::POST, "notifications/read-all"))
            .await?;
        Ok(())
    }

    async fn dismiss(&self, id: NotificationId) -> AppResult<()> {
        self.send(self.request(Method::POST, &format!("notifications/{id}/dismiss")))
            .await?;
        Ok(())
    }

    async fn dismiss_all(&self) -> AppResult<()> {
        self.send(self.request(Method::POST, "notifications/dismiss-all"))
            .await?;
        Ok(())
    }

    async fn execute_action(&self, id: NotificationId, action_id: &str) -> AppResult<()> {
        self.send(self.request(
            Method::POST,
            &format!("notifications/{id}/actions/{action_id}"),
        ))
        .await?;
        Ok(())
    }
}

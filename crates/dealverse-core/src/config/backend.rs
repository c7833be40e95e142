//! REST backend client configuration.

use serde::{Deserialize, Serialize};

/// Settings for the backend API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the DealVerse REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token attached to every request, if set.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Page size used when fetching the recent-notification backlog at startup.
    #[serde(default = "default_sync_limit")]
    pub sync_limit: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            timeout_seconds: default_timeout(),
            sync_limit: default_sync_limit(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_sync_limit() -> usize {
    50
}

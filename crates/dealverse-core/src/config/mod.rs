//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod backend;
pub mod logging;
pub mod notifications;
pub mod source;
pub mod toast;

use serde::{Deserialize, Serialize};

pub use self::backend::BackendConfig;
pub use self::logging::LoggingConfig;
pub use self::notifications::NotificationsConfig;
pub use self::source::SourceConfig;
pub use self::toast::ToastConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay). Every
/// section is optional; missing sections fall back to their defaults so
/// the notifier can start with no configuration file at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST backend client settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Push-event source settings.
    #[serde(default)]
    pub source: SourceConfig,
    /// Notification store and maintenance settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Toast scheduler settings.
    #[serde(default)]
    pub toast: ToastConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `DEALVERSE__`. The config
    /// directory defaults to `config/` and can be relocated with
    /// `DEALVERSE_CONFIG_DIR`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let dir =
            std::env::var("DEALVERSE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DEALVERSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

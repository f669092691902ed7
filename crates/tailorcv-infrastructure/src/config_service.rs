//! Configuration loading.
//!
//! Resolves the client configuration from the environment with a
//! `config.toml` fallback.
//!
//! Priority:
//! 1. Environment variables (`TAILORCV_API_URL`, `TAILORCV_GOOGLE_CLIENT_ID`)
//! 2. `~/.config/tailorcv/config.toml`

use crate::paths::TailorCvPaths;
use std::path::PathBuf;
use tailorcv_core::config::AppConfig;
use tailorcv_core::error::Result;

/// Environment variable naming the backend base URL.
pub const ENV_API_URL: &str = "TAILORCV_API_URL";
/// Environment variable naming the Google OAuth client id.
pub const ENV_GOOGLE_CLIENT_ID: &str = "TAILORCV_GOOGLE_CLIENT_ID";

/// Loads and validates the client configuration.
pub struct ConfigService {
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Reads configuration from the default file location.
    pub fn new() -> Self {
        Self {
            path: TailorCvPaths::config_file().ok(),
        }
    }

    /// Reads configuration from a custom file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Resolves the effective configuration.
    ///
    /// A missing file is fine as long as the environment supplies both
    /// values; a present-but-unparseable file is an error. The result is
    /// normalized and validated, so a missing value surfaces as a `Config`
    /// error here rather than as a broken request later.
    pub fn load(&self) -> Result<AppConfig> {
        let file_config = match &self.path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str::<AppConfig>(&content)?
            }
            _ => {
                tracing::debug!("[Config] No config file, relying on environment");
                AppConfig::default()
            }
        };

        let config = merge_env(
            file_config,
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_GOOGLE_CLIENT_ID).ok(),
        )
        .normalized();

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_env(
    mut config: AppConfig,
    api_base_url: Option<String>,
    google_client_id: Option<String>,
) -> AppConfig {
    if let Some(url) = api_base_url {
        if !url.trim().is_empty() {
            config.api_base_url = url;
        }
    }
    if let Some(id) = google_client_id {
        if !id.trim().is_empty() {
            config.google_client_id = id;
        }
    }
    config
}

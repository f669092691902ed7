//! Client configuration model.

use crate::error::{Result, TailorCvError};
use serde::{Deserialize, Serialize};

/// Environment-level configuration the client cannot run without.
///
/// Both values are required; a missing one is a `Config` error surfaced to
/// the affected feature (the whole app for the base URL, the sign-in widget
/// for the client id), never a crash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the TailorCV backend (no trailing slash)
    #[serde(default)]
    pub api_base_url: String,
    /// OAuth client identifier for the Google sign-in widget
    #[serde(default)]
    pub google_client_id: String,
}

impl AppConfig {
    /// Trims a trailing slash so endpoint paths can be appended verbatim.
    pub fn normalized(mut self) -> Self {
        while self.api_base_url.ends_with('/') {
            self.api_base_url.pop();
        }
        self
    }

    /// Verifies both required values are present.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(TailorCvError::config(
                "Backend API base URL is not configured",
            ));
        }
        if self.google_client_id.trim().is_empty() {
            return Err(TailorCvError::config(
                "Google client id is not configured",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_both_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().unwrap_err().is_config());

        config.api_base_url = "https://api.tailorcv.app".to_string();
        assert!(config.validate().unwrap_err().is_config());

        config.google_client_id = "client-123".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_normalized_strips_trailing_slash() {
        let config = AppConfig {
            api_base_url: "https://api.tailorcv.app/".to_string(),
            google_client_id: "client-123".to_string(),
        };
        assert_eq!(config.normalized().api_base_url, "https://api.tailorcv.app");
    }
}

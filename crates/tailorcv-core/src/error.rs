//! Error types for the TailorCV client.

use thiserror::Error;

/// A shared error type for the entire TailorCV client.
///
/// Variants follow the client's failure taxonomy: configuration problems are
/// persistent and not retried, authentication failures invalidate the current
/// session, network failures may be retried by the user, validation failures
/// never reach the network, and submission failures come back from the
/// backend with a displayable message.
#[derive(Error, Debug, Clone)]
pub enum TailorCvError {
    /// Missing or invalid client configuration (API base URL, client id)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend rejected a credential or session token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport-level failure (connect, timeout, 5xx)
    #[error("Network error: {message}")]
    Network { message: String, retryable: bool },

    /// Bad field or file input; blocks submission locally
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend responded with a failure for a submission
    #[error("Submission failed: {0}")]
    Submission(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TailorCvError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>, retryable: bool) -> Self {
        Self::Network {
            message: message.into(),
            retryable,
        }
    }

    /// Creates a retryable Network error
    pub fn transient(message: impl Into<String>) -> Self {
        Self::network(message, true)
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Submission error
    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the user may reasonably retry the failed operation as-is.
    ///
    /// Only transport-level failures qualify; authentication and
    /// configuration failures require a different action first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { retryable: true, .. })
    }

    /// A short message suitable for display in the UI.
    pub fn display_message(&self) -> String {
        match self {
            Self::Network { message, .. } => message.clone(),
            Self::Auth(m)
            | Self::Config(m)
            | Self::Validation(m)
            | Self::Submission(m)
            | Self::Internal(m) => m.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for TailorCvError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TailorCvError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TailorCvError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TailorCvError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TailorCvError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
            retryable: err.is_connect() || err.is_timeout(),
        }
    }
}

/// A type alias for `Result<T, TailorCvError>`.
pub type Result<T> = std::result::Result<T, TailorCvError>;

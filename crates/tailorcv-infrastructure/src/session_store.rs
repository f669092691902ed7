//! TOML-backed session store.
//!
//! Persists the session mirror as a single TOML document so the token and
//! user record are written and cleared together; there is no way to observe
//! one without the other.

use crate::paths::TailorCvPaths;
use crate::storage::AtomicRecordFile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tailorcv_core::error::{Result, TailorCvError};
use tailorcv_core::session::{Session, SessionStore};
use tailorcv_core::user::User;

/// Persistence shape of the session mirror.
///
/// Kept separate from the domain `Session` so the stored layout can evolve
/// without touching domain code.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    token: String,
    user: User,
    #[serde(default)]
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user: session.user.clone(),
            expires_at: session.expires_at,
        }
    }
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Session {
            token: record.token,
            user: record.user,
            expires_at: record.expires_at,
        }
    }
}

/// File-backed [`SessionStore`] storing one whole-record TOML document.
pub struct TomlSessionStore {
    file: AtomicRecordFile<SessionRecord>,
}

impl TomlSessionStore {
    /// Creates a store at the default location
    /// (`~/.config/tailorcv/session.toml`).
    pub fn new() -> Result<Self> {
        let path = TailorCvPaths::session_file()
            .map_err(|e| TailorCvError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: std::path::PathBuf) -> Self {
        Self {
            file: AtomicRecordFile::new(path),
        }
    }
}

#[async_trait]
impl SessionStore for TomlSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let file = self.file.clone();
        let record = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| TailorCvError::internal(format!("Failed to join task: {}", e)))??;
        Ok(record.map(Session::from))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let file = self.file.clone();
        let record = SessionRecord::from(session);
        tokio::task::spawn_blocking(move || file.save(&record))
            .await
            .map_err(|e| TailorCvError::internal(format!("Failed to join task: {}", e)))??;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.clear())
            .await
            .map_err(|e| TailorCvError::internal(format!("Failed to join task: {}", e)))??;
        tracing::debug!("[SessionStore] Cleared persisted session");
        Ok(())
    }
}

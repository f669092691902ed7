//! Session store trait.
//!
//! Defines the interface for durable session persistence.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for the persisted session mirror.
///
/// The store holds at most one session and must be atomic with respect to
/// the record it stores: a reader must never observe a token without its
/// matching user or vice versa. All writes are whole-record replacements.
///
/// # Implementation Notes
///
/// Implementations should treat a missing entry as absence, not an error;
/// `load()` returns `Ok(None)` for it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the persisted session, if any.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: a complete session record was found
    /// - `Ok(None)`: nothing is persisted
    /// - `Err(_)`: the record exists but could not be read or parsed
    async fn load(&self) -> Result<Option<Session>>;

    /// Replaces the persisted session with `session`, atomically.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Removes the persisted session. Clearing an empty store is not an
    /// error.
    async fn clear(&self) -> Result<()>;
}

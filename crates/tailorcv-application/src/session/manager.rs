use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tailorcv_core::auth::AuthGateway;
use tailorcv_core::error::Result;
use tailorcv_core::session::{Session, SessionStore};
use tokio::sync::RwLock;

/// The published session state.
///
/// `Loading` covers the window between process start and bootstrap
/// resolution; navigation must not be decided against it. After bootstrap
/// the phase is always one of the two resolved variants.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    /// Bootstrap has not resolved yet
    Loading,
    /// No authenticated session
    SignedOut,
    /// An authenticated session is active
    SignedIn(Session),
}

/// Single source of truth for the current session.
///
/// `SessionManager` owns the in-memory session and treats the persisted
/// store strictly as a durability mirror: every divergence is resolved in
/// favor of what the backend says, and anything the backend rejects is
/// cleared rather than trusted.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    auth: Arc<dyn AuthGateway>,
    phase: RwLock<SessionPhase>,
    /// Set when the owning shell is torn down; a late bootstrap resolution
    /// must not mutate published state afterwards.
    shutdown: AtomicBool,
}

impl SessionManager {
    /// Creates a new `SessionManager` over a store and auth backend.
    pub fn new(store: Arc<dyn SessionStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self {
            store,
            auth,
            phase: RwLock::new(SessionPhase::Loading),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Returns the currently published phase.
    pub async fn phase(&self) -> SessionPhase {
        self.phase.read().await.clone()
    }

    /// Returns the active session, if one is published.
    pub async fn session(&self) -> Option<Session> {
        match &*self.phase.read().await {
            SessionPhase::SignedIn(session) => Some(session.clone()),
            _ => None,
        }
    }

    /// Marks the manager as torn down. Pending async resolutions observe
    /// this and stop publishing.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Restores and verifies the persisted session at boot.
    ///
    /// Always resolves before routing decisions are made: either to an
    /// active session (with the user record refreshed from the backend and
    /// re-persisted, healing stale cached fields) or to signed-out with the
    /// untrustworthy persisted copy cleared. Failures never propagate out
    /// of here; they all degrade to "no session".
    pub async fn bootstrap(&self) -> Option<Session> {
        let stored = match self.store.load().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::info!("[Session] No persisted session");
                self.publish(SessionPhase::SignedOut).await;
                return None;
            }
            Err(e) => {
                tracing::warn!("[Session] Persisted session unreadable ({}), clearing", e);
                self.clear_untrusted().await;
                return None;
            }
        };

        match self.auth.verify(&stored.token).await {
            Ok(fresh_user) => {
                let session = Session {
                    token: stored.token,
                    user: fresh_user,
                    expires_at: stored.expires_at,
                };
                // Re-persist so the mirror carries the fresh user record.
                if let Err(e) = self.store.save(&session).await {
                    tracing::warn!("[Session] Failed to refresh persisted session: {}", e);
                }
                self.publish(SessionPhase::SignedIn(session.clone())).await;
                tracing::info!("[Session] Restored session for user {}", session.user.id);
                Some(session)
            }
            Err(e) => {
                tracing::info!("[Session] Stored session rejected ({}), clearing", e);
                self.clear_untrusted().await;
                None
            }
        }
    }

    /// Exchanges an identity-provider credential for a session.
    ///
    /// On success the session is persisted and published; on failure the
    /// current state is untouched and the classified error goes back to the
    /// caller (no silent retries).
    pub async fn login(&self, credential: &str) -> Result<Session> {
        let session = self.auth.exchange(credential).await?;

        if let Err(e) = self.store.save(&session).await {
            // The in-memory session still works for this run; only the
            // mirror is stale.
            tracing::warn!("[Session] Failed to persist session: {}", e);
        }
        self.publish(SessionPhase::SignedIn(session.clone())).await;
        tracing::info!("[Session] Signed in as {}", session.user.id);
        Ok(session)
    }

    /// Signs out locally, with best-effort backend invalidation.
    ///
    /// A failing backend or store never traps the user in the signed-in
    /// state: the phase always lands on `SignedOut`.
    pub async fn logout(&self) {
        if let Some(session) = self.session().await {
            if let Err(e) = self.auth.invalidate(&session.token).await {
                tracing::warn!("[Session] Backend logout failed (ignored): {}", e);
            }
        }
        if let Err(e) = self.store.clear().await {
            tracing::warn!("[Session] Failed to clear persisted session: {}", e);
        }
        self.publish(SessionPhase::SignedOut).await;
        tracing::info!("[Session] Signed out");
    }

    /// Clears the persisted mirror and publishes signed-out.
    async fn clear_untrusted(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!("[Session] Failed to clear persisted session: {}", e);
        }
        self.publish(SessionPhase::SignedOut).await;
    }

    async fn publish(&self, phase: SessionPhase) {
        if self.shutdown.load(Ordering::SeqCst) {
            tracing::debug!("[Session] Dropped phase update after shutdown");
            return;
        }
        *self.phase.write().await = phase;
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;

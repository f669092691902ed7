//! Application shell composition.
//!
//! Thin glue between the session manager and the route gate: it answers
//! "what should be on screen for this path" and nothing else. Pages,
//! rendering, and styling live elsewhere.

use crate::session::{SessionManager, SessionPhase};
use std::sync::Arc;
use tailorcv_core::route::{decide_path, RouteDecision};

/// What the shell shows for a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellView {
    /// Bootstrap has not resolved; show the loading state, decide nothing
    Loading,
    /// Render this page (the requested one, or the gate's redirect target)
    Page(String),
}

/// Composes [`SessionManager`] and the route gate.
pub struct AppShell {
    sessions: Arc<SessionManager>,
}

impl AppShell {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Resolves the boot-time session before any routing happens.
    pub async fn boot(&self) {
        self.sessions.bootstrap().await;
    }

    /// Maps a requested path to what should be rendered.
    ///
    /// Until [`boot`](Self::boot) resolves, every request is `Loading`;
    /// the gate is never evaluated against a guess.
    pub async fn view_for(&self, requested: &str) -> ShellView {
        let session = match self.sessions.phase().await {
            SessionPhase::Loading => return ShellView::Loading,
            SessionPhase::SignedOut => None,
            SessionPhase::SignedIn(session) => Some(session),
        };

        match decide_path(session.as_ref(), requested) {
            RouteDecision::Allow => ShellView::Page(requested.to_string()),
            RouteDecision::Redirect(target) => {
                tracing::debug!("[Shell] {} redirected to {}", requested, target);
                ShellView::Page(target.to_string())
            }
        }
    }
}

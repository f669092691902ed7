//! Gated navigation decisions.
//!
//! `decide` is a pure, total function from the published session and a
//! requested path to exactly one navigation outcome. It performs no I/O and
//! never triggers a session verification; callers evaluate it only against a
//! resolved session (never while bootstrap is still pending).

use crate::session::Session;

/// Path of the public sign-in page.
pub const SIGN_IN_PATH: &str = "/signin";

/// Where an already-authenticated visitor lands when they hit a public page.
pub const DEFAULT_AUTHENTICATED_PATH: &str = "/generate";

/// Paths reachable without a session.
pub const PUBLIC_PATHS: [&str; 2] = ["/", SIGN_IN_PATH];

/// Returns true if `path` is reachable without a session.
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// The outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested path
    Allow,
    /// Navigate to this path instead
    Redirect(&'static str),
}

/// Decides whether `path` may be rendered for the given session.
///
/// - public path + active session: redirect to the authenticated landing
///   page (no redundant sign-in UI)
/// - protected path + no session: redirect to the sign-in page
/// - anything else: allow
pub fn decide(session: Option<&Session>, _path: &str, is_public: bool) -> RouteDecision {
    match (session, is_public) {
        (Some(_), true) => RouteDecision::Redirect(DEFAULT_AUTHENTICATED_PATH),
        (None, false) => RouteDecision::Redirect(SIGN_IN_PATH),
        _ => RouteDecision::Allow,
    }
}

/// Convenience wrapper classifying `path` with [`is_public_path`].
pub fn decide_path(session: Option<&Session>, path: &str) -> RouteDecision {
    decide(session, path, is_public_path(path))
}

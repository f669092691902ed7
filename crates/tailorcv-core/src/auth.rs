//! Backend authentication gateway trait.
//!
//! Decouples the session lifecycle from the concrete HTTP client talking to
//! the backend's auth endpoints.

use crate::error::Result;
use crate::session::Session;
use crate::user::User;
use async_trait::async_trait;

/// The backend authentication collaborator.
///
/// Implementations classify every failure into the client's error taxonomy:
/// a rejected token or credential is an `Auth` error, transport failures are
/// `Network` errors, and malformed payloads are `Serialization` errors.
/// Callers decide what each class means for session state.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Asks the backend who the holder of `token` is.
    ///
    /// Returns the fresh user record on success. An invalid or expired
    /// token is an `Auth` error, which callers treat as "this session is
    /// untrustworthy".
    async fn verify(&self, token: &str) -> Result<User>;

    /// Exchanges an identity-provider credential for a session.
    ///
    /// The credential is opaque to the client; only the backend validates
    /// its contents.
    async fn exchange(&self, credential: &str) -> Result<Session>;

    /// Invalidates `token` server-side.
    ///
    /// Best-effort from the caller's point of view: local logout proceeds
    /// whether or not this succeeds.
    async fn invalidate(&self, token: &str) -> Result<()>;
}

//! Session domain model.
//!
//! A session is the authenticated identity of the current client: an opaque
//! bearer token paired with the user record the backend associates with it.

use crate::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated identity of the current client.
///
/// A session is either fully present (token and user together) or fully
/// absent. The `SessionManager` is the sole owner; the persisted copy in the
/// session store is a mirror for durability across restarts, never a second
/// source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token issued by the backend at login
    pub token: String,
    /// The user record the backend bound to this token
    pub user: User,
    /// Server-reported expiry, carried opaquely; never evaluated client-side
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
            expires_at: None,
        }
    }
}

//! User domain model.
//!
//! The user record is the single display source of truth for plan state
//! (premium or free) and generation counters. It is only ever replaced
//! wholesale after a successful backend read or login; nothing in the
//! client patches individual fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user as the backend describes it.
///
/// Constructed exclusively from a normalized backend payload; optional
/// fields are ones the backend genuinely omits for fresh accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned user identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Account email address
    pub email: String,
    /// Avatar URL from the identity provider
    #[serde(default)]
    pub profile_picture_url: String,
    /// Whether the account has an active premium plan
    #[serde(default)]
    pub is_premium: bool,
    /// Number of resume generations performed by this account
    #[serde(default)]
    pub generation_count: u32,
    /// Account creation time, when the backend reports it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Time of the most recent resume generation
    #[serde(default)]
    pub last_generated_at: Option<DateTime<Utc>>,
    /// Time the account was upgraded to premium
    #[serde(default)]
    pub upgraded_at: Option<DateTime<Utc>>,
}

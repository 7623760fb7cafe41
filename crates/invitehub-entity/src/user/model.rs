//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use invitehub_core::types::UserId;

/// An authenticated account, keyed by normalized email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert-or-update payload keyed by `email`.
///
/// `id` and `username` are only used when no user with that email exists yet.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub picture_url: Option<String>,
    pub now: DateTime<Utc>,
}

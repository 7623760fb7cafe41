//! Invitation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use invitehub_core::types::{InvitationId, UserId};

use super::content::InvitationContent;

/// The shared resource under access control.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    /// Unique invitation identifier.
    pub id: InvitationId,
    /// The creating user.
    pub owner_id: UserId,
    /// Public URL slug (unique).
    pub slug: String,
    /// Selected theme from the external catalog.
    pub theme_id: Option<String>,
    /// Selected background song from the external catalog.
    pub song_id: Option<String>,
    /// Page content.
    pub content: Json<InvitationContent>,
    /// When the invitation was created.
    pub created_at: DateTime<Utc>,
    /// When the invitation lapses; never null.
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    /// Whether the invitation has lapsed as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether `user_id` created this invitation.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create a new invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitation {
    pub id: InvitationId,
    pub owner_id: UserId,
    pub slug: String,
    pub theme_id: Option<String>,
    pub song_id: Option<String>,
    pub content: InvitationContent,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Replacement content for an existing invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInvitation {
    pub slug: String,
    pub theme_id: Option<String>,
    pub song_id: Option<String>,
    pub content: InvitationContent,
}

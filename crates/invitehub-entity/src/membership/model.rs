//! Membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use invitehub_core::types::{InvitationId, MembershipId, UserId};

use super::role::MemberRole;

/// A confirmed (invitation, user, role) access grant.
///
/// At most one row exists per (invitation, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// Unique membership identifier.
    pub id: MembershipId,
    /// The invitation this grant applies to.
    pub invitation_id: InvitationId,
    /// The member.
    pub user_id: UserId,
    /// Role held on the invitation.
    pub role: MemberRole,
    /// When the member joined.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Pre-generated identifier, used only if the row does not exist yet.
    pub id: MembershipId,
    /// The invitation.
    pub invitation_id: InvitationId,
    /// The member.
    pub user_id: UserId,
    /// Requested role.
    pub role: MemberRole,
    /// Join time.
    pub created_at: DateTime<Utc>,
}

/// A membership joined with the member's public profile, for member listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberView {
    /// Membership identifier.
    pub id: MembershipId,
    /// The member's user id.
    pub user_id: UserId,
    /// The member's username.
    pub username: String,
    /// The member's email.
    pub email: String,
    /// Role held on the invitation.
    pub role: MemberRole,
    /// When the member joined.
    pub joined_at: DateTime<Utc>,
}

//! Invite ticket entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use invitehub_core::types::{InvitationId, TicketId, UserId};

use super::state::TicketState;
use crate::membership::MemberRole;

/// A single-use, time-boxed, email-bound offer of a role on an invitation.
///
/// Only the digest of the invite token is ever stored. The digest is kept
/// out of serialized output; listings use [`TicketSummary`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    /// Unique ticket identifier.
    pub id: TicketId,
    /// The invitation being offered.
    pub invitation_id: InvitationId,
    /// Normalized invitee email the ticket is bound to.
    pub email: String,
    /// Role granted on claim.
    pub role: MemberRole,
    /// One-way digest of the raw token.
    #[serde(skip_serializing)]
    pub token_digest: String,
    /// Claim deadline.
    pub expires_at: DateTime<Utc>,
    /// Flips to true exactly once.
    pub is_claimed: bool,
    /// The owner or editor who issued the ticket.
    pub invited_by: UserId,
    /// When the ticket was issued.
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Lifecycle state as of `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> TicketState {
        if self.is_claimed {
            TicketState::Claimed
        } else if now < self.expires_at {
            TicketState::Pending
        } else {
            TicketState::Expired
        }
    }

    /// A ticket is usable iff unclaimed and `now < expires_at`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now).is_usable()
    }

    /// Digest-free view for listings.
    pub fn summarize(&self, now: DateTime<Utc>) -> TicketSummary {
        TicketSummary {
            id: self.id,
            invitation_id: self.invitation_id,
            email: self.email.clone(),
            role: self.role,
            state: self.state_at(now),
            is_claimed: self.is_claimed,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

/// Data required to persist a new ticket.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub id: TicketId,
    pub invitation_id: InvitationId,
    pub email: String,
    pub role: MemberRole,
    pub token_digest: String,
    pub expires_at: DateTime<Utc>,
    pub invited_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Ticket record as shown to owners and editors. Carries neither token nor digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub id: TicketId,
    pub invitation_id: InvitationId,
    pub email: String,
    pub role: MemberRole,
    pub state: TicketState,
    pub is_claimed: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A pending ticket as shown to the invitee, with a summary of the invitation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingInvite {
    pub ticket_id: TicketId,
    pub invitation_id: InvitationId,
    pub email: String,
    pub role: MemberRole,
    pub expires_at: DateTime<Utc>,
    pub invitation_slug: String,
    pub groom_name: String,
    pub bride_name: String,
    /// Username of the invitation's owner.
    pub owner_username: String,
}

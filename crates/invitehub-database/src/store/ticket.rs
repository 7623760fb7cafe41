//! Invite ticket persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use invitehub_core::result::AppResult;
use invitehub_core::types::{InvitationId, TicketId};
use invitehub_entity::membership::{CreateMembership, Membership};
use invitehub_entity::ticket::{CreateTicket, PendingInvite, Ticket};

/// Storage for invite tickets.
#[async_trait]
pub trait TicketStore: Send + Sync + 'static {
    /// Persist a new ticket.
    async fn create(&self, data: &CreateTicket) -> AppResult<Ticket>;

    /// The ticket with this digest, only if unclaimed, `now < expires_at`,
    /// and its invitation is still live.
    async fn find_usable_by_digest(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Ticket>>;

    /// Atomically mark the ticket claimed and record the membership.
    ///
    /// The ticket flips only if it is still usable at `now`, in the same
    /// sense as [`find_usable_by_digest`](Self::find_usable_by_digest).
    /// Returns `None` when it did not flip, in which case nothing was written.
    /// Otherwise returns the effective membership; a pre-existing membership
    /// keeps its role.
    async fn claim(
        &self,
        ticket_id: TicketId,
        now: DateTime<Utc>,
        membership: &CreateMembership,
    ) -> AppResult<Option<Membership>>;

    /// Usable tickets for `email`, with a summary of each invitation.
    async fn list_pending_for_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<PendingInvite>>;

    /// Every ticket of an invitation, newest first.
    async fn list_for_invitation(&self, invitation_id: InvitationId) -> AppResult<Vec<Ticket>>;
}

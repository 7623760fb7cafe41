//! Invite ticket repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use invitehub_core::error::{AppError, ErrorKind};
use invitehub_core::result::AppResult;
use invitehub_core::types::{InvitationId, TicketId};
use invitehub_entity::membership::{CreateMembership, Membership};
use invitehub_entity::ticket::{CreateTicket, PendingInvite, Ticket};

use super::membership::insert_if_absent_on;
use super::{begin, commit, write_error};
use crate::store::TicketStore;

/// Repository for invite tickets, including the atomic claim.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    /// Create a new ticket repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for TicketRepository {
    async fn create(&self, data: &CreateTicket) -> AppResult<Ticket> {
        sqlx::query_as::<_, Ticket>(
            "INSERT INTO invitation_tickets \
             (id, invitation_id, email, role, token_digest, expires_at, is_claimed, invited_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8) RETURNING *",
        )
        .bind(data.id)
        .bind(data.invitation_id)
        .bind(&data.email)
        .bind(data.role)
        .bind(&data.token_digest)
        .bind(data.expires_at)
        .bind(data.invited_by)
        .bind(data.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to create ticket", e))
    }

    async fn find_usable_by_digest(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "SELECT t.* FROM invitation_tickets t \
             JOIN invitations i ON i.id = t.invitation_id \
             WHERE t.token_digest = $1 AND NOT t.is_claimed AND t.expires_at > $2 \
               AND i.expires_at >= $2",
        )
        .bind(token_digest)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ticket", e))
    }

    async fn claim(
        &self,
        ticket_id: TicketId,
        now: DateTime<Utc>,
        membership: &CreateMembership,
    ) -> AppResult<Option<Membership>> {
        let mut tx = begin(&self.pool).await?;

        // Lock the parent invitation before the ticket row, the same order a
        // cascading invitation delete takes, so a claim racing a purge
        // serialises instead of deadlocking.
        let parent = sqlx::query_scalar::<_, InvitationId>(
            "SELECT i.id FROM invitations i \
             JOIN invitation_tickets t ON t.invitation_id = i.id \
             WHERE t.id = $1 FOR KEY SHARE OF i",
        )
        .bind(ticket_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock invitation", e))?;

        if parent.is_none() {
            return Ok(None);
        }

        let flipped = sqlx::query(
            "UPDATE invitation_tickets t SET is_claimed = TRUE \
             FROM invitations i \
             WHERE t.id = $1 AND NOT t.is_claimed AND t.expires_at > $2 \
               AND i.id = t.invitation_id AND i.expires_at >= $2",
        )
        .bind(ticket_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim ticket", e))?
        .rows_affected();

        if flipped == 0 {
            // Dropping the transaction rolls it back.
            return Ok(None);
        }

        let effective = insert_if_absent_on(&mut tx, membership).await?;
        commit(tx).await?;
        Ok(Some(effective))
    }

    async fn list_pending_for_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<PendingInvite>> {
        sqlx::query_as::<_, PendingInvite>(
            "SELECT t.id AS ticket_id, t.invitation_id, t.email, t.role, t.expires_at, \
                    i.slug AS invitation_slug, \
                    COALESCE(i.content->>'groom_name', '') AS groom_name, \
                    COALESCE(i.content->>'bride_name', '') AS bride_name, \
                    u.username AS owner_username \
             FROM invitation_tickets t \
             JOIN invitations i ON i.id = t.invitation_id \
             JOIN users u ON u.id = i.owner_id \
             WHERE t.email = $1 AND NOT t.is_claimed AND t.expires_at > $2 \
               AND i.expires_at >= $2 \
             ORDER BY t.created_at DESC",
        )
        .bind(email)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list pending invites", e)
        })
    }

    async fn list_for_invitation(&self, invitation_id: InvitationId) -> AppResult<Vec<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM invitation_tickets WHERE invitation_id = $1 ORDER BY created_at DESC",
        )
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tickets", e))
    }
}

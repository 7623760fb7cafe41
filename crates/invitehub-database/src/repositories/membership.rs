//! Membership repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use invitehub_core::error::{AppError, ErrorKind};
use invitehub_core::result::AppResult;
use invitehub_core::types::{InvitationId, UserId};
use invitehub_entity::membership::{CreateMembership, MemberView, Membership};

use super::{begin, commit, write_error};
use crate::store::MembershipStore;

/// Repository for invitation memberships.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert-or-keep on `(invitation_id, user_id)` and return the surviving row.
///
/// Shared with the ticket claim so both paths run the same statement pair
/// inside the caller's transaction.
pub(crate) async fn insert_if_absent_on(
    conn: &mut PgConnection,
    data: &CreateMembership,
) -> AppResult<Membership> {
    sqlx::query(
        "INSERT INTO invitation_members (id, invitation_id, user_id, role, created_at) \
         VALUES ($1, $2, $3, $4, $5) ON CONFLICT (invitation_id, user_id) DO NOTHING",
    )
    .bind(data.id)
    .bind(data.invitation_id)
    .bind(data.user_id)
    .bind(data.role)
    .bind(data.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| write_error("Failed to add member", e))?;

    sqlx::query_as::<_, Membership>(
        "SELECT * FROM invitation_members WHERE invitation_id = $1 AND user_id = $2",
    )
    .bind(data.invitation_id)
    .bind(data.user_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load membership", e))
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn insert_if_absent(&self, data: &CreateMembership) -> AppResult<Membership> {
        let mut tx = begin(&self.pool).await?;
        let membership = insert_if_absent_on(&mut tx, data).await?;
        commit(tx).await?;
        Ok(membership)
    }

    async fn find(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
    ) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM invitation_members WHERE invitation_id = $1 AND user_id = $2",
        )
        .bind(invitation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    async fn list_members(&self, invitation_id: InvitationId) -> AppResult<Vec<MemberView>> {
        sqlx::query_as::<_, MemberView>(
            "SELECT m.id, m.user_id, u.username, u.email, m.role, m.created_at AS joined_at \
             FROM invitation_members m JOIN users u ON u.id = m.user_id \
             WHERE m.invitation_id = $1 \
             ORDER BY m.created_at ASC, m.id ASC",
        )
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }

    async fn delete_for_invitation(&self, invitation_id: InvitationId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM invitation_members WHERE invitation_id = $1")
            .bind(invitation_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove members", e))?;
        Ok(result.rows_affected())
    }
}

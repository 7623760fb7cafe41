//! Invitation repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use invitehub_core::error::{AppError, ErrorKind};
use invitehub_core::result::AppResult;
use invitehub_core::types::{InvitationId, UserId};
use invitehub_entity::invitation::{CreateInvitation, Invitation, UpdateInvitation};
use invitehub_entity::membership::CreateMembership;

use super::{begin, commit, write_error};
use crate::store::InvitationStore;

/// Repository for invitations and their lazy expiration.
#[derive(Debug, Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Create a new invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn create_with_owner(
        &self,
        invitation: &CreateInvitation,
        owner: &CreateMembership,
    ) -> AppResult<Invitation> {
        let mut tx = begin(&self.pool).await?;

        let created = sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (id, owner_id, slug, theme_id, song_id, content, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(invitation.id)
        .bind(invitation.owner_id)
        .bind(&invitation.slug)
        .bind(&invitation.theme_id)
        .bind(&invitation.song_id)
        .bind(Json(&invitation.content))
        .bind(invitation.created_at)
        .bind(invitation.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error("Failed to create invitation", e))?;

        sqlx::query(
            "INSERT INTO invitation_members (id, invitation_id, user_id, role, created_at) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (invitation_id, user_id) DO NOTHING",
        )
        .bind(owner.id)
        .bind(owner.invitation_id)
        .bind(owner.user_id)
        .bind(owner.role)
        .bind(owner.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("Failed to add owner membership", e))?;

        commit(tx).await?;
        Ok(created)
    }

    async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM invitations WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check slug", e))
    }

    async fn find_by_id(&self, id: InvitationId) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find invitation", e))
    }

    async fn find_live_by_id(
        &self,
        id: InvitationId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "SELECT * FROM invitations WHERE id = $1 AND expires_at >= $2",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find invitation", e))
    }

    async fn list_live_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "SELECT i.* FROM invitations i \
             WHERE i.expires_at >= $2 \
               AND (i.owner_id = $1 OR EXISTS ( \
                    SELECT 1 FROM invitation_members m \
                    WHERE m.invitation_id = i.id AND m.user_id = $1)) \
             ORDER BY i.created_at DESC",
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list invitations", e))
    }

    async fn delete_expired_for_owner(
        &self,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM invitations WHERE owner_id = $1 AND expires_at < $2")
            .bind(owner_id)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired invitations", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn update(
        &self,
        id: InvitationId,
        data: &UpdateInvitation,
    ) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "UPDATE invitations SET slug = $2, theme_id = $3, song_id = $4, content = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.slug)
        .bind(&data.theme_id)
        .bind(&data.song_id)
        .bind(Json(&data.content))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("Failed to update invitation", e))
    }

    async fn set_expiry(
        &self,
        id: InvitationId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "UPDATE invitations SET expires_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to renew invitation", e))
    }

    async fn delete(&self, id: InvitationId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete invitation", e))?;
        Ok(result.rows_affected() > 0)
    }
}

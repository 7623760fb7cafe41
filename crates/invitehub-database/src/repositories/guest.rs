//! Guest repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use invitehub_core::error::{AppError, ErrorKind};
use invitehub_core::result::AppResult;
use invitehub_core::types::{GuestId, InvitationId};
use invitehub_entity::guest::{CreateGuest, Guest};

use super::{begin, commit, write_error};
use crate::store::GuestStore;

/// Repository for invitation guests.
#[derive(Debug, Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    /// Create a new guest repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn raw_ids(ids: &[GuestId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.into_uuid()).collect()
}

#[async_trait]
impl GuestStore for GuestRepository {
    async fn list_for_invitation(&self, invitation_id: InvitationId) -> AppResult<Vec<Guest>> {
        sqlx::query_as::<_, Guest>(
            "SELECT * FROM guests WHERE invitation_id = $1 ORDER BY name ASC, id ASC",
        )
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list guests", e))
    }

    async fn find_by_ids(&self, ids: &[GuestId]) -> AppResult<Vec<Guest>> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = ANY($1)")
            .bind(raw_ids(ids))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find guests", e))
    }

    async fn slug_exists(&self, invitation_id: InvitationId, slug: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM guests WHERE invitation_id = $1 AND slug = $2)",
        )
        .bind(invitation_id)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check guest slug", e))
    }

    async fn create_many(&self, guests: &[CreateGuest]) -> AppResult<Vec<Guest>> {
        let mut tx = begin(&self.pool).await?;
        let mut created = Vec::with_capacity(guests.len());

        for guest in guests {
            let row = sqlx::query_as::<_, Guest>(
                "INSERT INTO guests \
                 (id, invitation_id, name, slug, kind, whatsapp, email, pax_request, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
            )
            .bind(guest.id)
            .bind(guest.invitation_id)
            .bind(&guest.name)
            .bind(&guest.slug)
            .bind(guest.kind)
            .bind(&guest.whatsapp)
            .bind(&guest.email)
            .bind(guest.pax_request)
            .bind(guest.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| write_error("Failed to create guest", e))?;
            created.push(row);
        }

        commit(tx).await?;
        Ok(created)
    }

    async fn delete_many(&self, ids: &[GuestId]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM guests WHERE id = ANY($1)")
            .bind(raw_ids(ids))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete guests", e))?;
        Ok(result.rows_affected())
    }
}

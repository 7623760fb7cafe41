//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use invitehub_core::error::{AppError, ErrorKind};
use invitehub_core::result::AppResult;
use invitehub_core::types::UserId;
use invitehub_entity::user::{UpsertUser, User};

use super::write_error;
use crate::store::UserStore;

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check username", e))
    }

    async fn upsert_by_email(&self, data: &UpsertUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, username, first_name, last_name, picture_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) \
             ON CONFLICT (email) DO UPDATE SET \
                first_name = EXCLUDED.first_name, \
                last_name = EXCLUDED.last_name, \
                picture_url = EXCLUDED.picture_url, \
                updated_at = EXCLUDED.updated_at \
             RETURNING *",
        )
        .bind(data.id)
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.picture_url)
        .bind(data.now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("Failed to upsert user", e))
    }
}

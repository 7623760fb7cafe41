//! User persistence.

use async_trait::async_trait;

use invitehub_core::result::AppResult;
use invitehub_core::types::UserId;
use invitehub_entity::user::{UpsertUser, User};

/// Storage for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Lookup by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn username_exists(&self, username: &str) -> AppResult<bool>;

    /// Insert a new user or refresh the profile of the one with that email.
    async fn upsert_by_email(&self, data: &UpsertUser) -> AppResult<User>;
}

//! Invitation persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use invitehub_core::result::AppResult;
use invitehub_core::types::{InvitationId, UserId};
use invitehub_entity::invitation::{CreateInvitation, Invitation, UpdateInvitation};
use invitehub_entity::membership::CreateMembership;

/// Storage for invitations.
///
/// "Live" means `expires_at >= now`. Deleting an invitation removes its
/// memberships, tickets and guests with it.
#[async_trait]
pub trait InvitationStore: Send + Sync + 'static {
    /// Insert the invitation and its owner membership atomically.
    ///
    /// Fails with `Conflict` if the slug is taken.
    async fn create_with_owner(
        &self,
        invitation: &CreateInvitation,
        owner: &CreateMembership,
    ) -> AppResult<Invitation>;

    /// Whether any invitation uses `slug`.
    async fn slug_exists(&self, slug: &str) -> AppResult<bool>;

    /// Load an invitation regardless of expiry.
    async fn find_by_id(&self, id: InvitationId) -> AppResult<Option<Invitation>>;

    /// Load an invitation only if it is live at `now`.
    async fn find_live_by_id(
        &self,
        id: InvitationId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>>;

    /// Live invitations the user owns or is a member of, newest first.
    async fn list_live_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Invitation>>;

    /// Delete every invitation owned by `owner_id` with `expires_at < now`.
    async fn delete_expired_for_owner(
        &self,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Replace slug, catalog references and content.
    async fn update(
        &self,
        id: InvitationId,
        data: &UpdateInvitation,
    ) -> AppResult<Option<Invitation>>;

    /// Overwrite `expires_at`.
    async fn set_expiry(
        &self,
        id: InvitationId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>>;

    /// Delete one invitation. Returns `false` if it did not exist.
    async fn delete(&self, id: InvitationId) -> AppResult<bool>;
}

//! Guest persistence.

use async_trait::async_trait;

use invitehub_core::result::AppResult;
use invitehub_core::types::{GuestId, InvitationId};
use invitehub_entity::guest::{CreateGuest, Guest};

/// Storage for invitation guests.
#[async_trait]
pub trait GuestStore: Send + Sync + 'static {
    /// Guests of an invitation ordered by name.
    async fn list_for_invitation(&self, invitation_id: InvitationId) -> AppResult<Vec<Guest>>;

    /// Load guests by id. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[GuestId]) -> AppResult<Vec<Guest>>;

    /// Whether `slug` is taken within the invitation.
    async fn slug_exists(&self, invitation_id: InvitationId, slug: &str) -> AppResult<bool>;

    /// Insert all guests or none.
    async fn create_many(&self, guests: &[CreateGuest]) -> AppResult<Vec<Guest>>;

    /// Delete guests by id and return how many were removed.
    async fn delete_many(&self, ids: &[GuestId]) -> AppResult<u64>;
}

//! Membership persistence.

use async_trait::async_trait;

use invitehub_core::result::AppResult;
use invitehub_core::types::{InvitationId, UserId};
use invitehub_entity::membership::{CreateMembership, MemberView, Membership};

/// Storage for (invitation, user) role grants.
#[async_trait]
pub trait MembershipStore: Send + Sync + 'static {
    /// Insert unless a row for the pair exists, then return the surviving row.
    ///
    /// An existing row is returned unchanged, role included.
    async fn insert_if_absent(&self, data: &CreateMembership) -> AppResult<Membership>;

    /// The membership for the pair, if any.
    async fn find(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
    ) -> AppResult<Option<Membership>>;

    /// Members joined with their user profile, oldest first.
    async fn list_members(&self, invitation_id: InvitationId) -> AppResult<Vec<MemberView>>;

    /// Remove every membership of an invitation.
    async fn delete_for_invitation(&self, invitation_id: InvitationId) -> AppResult<u64>;
}

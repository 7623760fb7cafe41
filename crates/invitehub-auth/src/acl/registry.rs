//! Membership registry: the authority on who holds which role on an invitation.

use std::sync::Arc;

use tracing::{debug, info};

use invitehub_core::error::AppError;
use invitehub_core::traits::{Clock, IdGenerator};
use invitehub_core::types::{InvitationId, MembershipId, UserId};
use invitehub_database::store::MembershipStore;
use invitehub_entity::invitation::Invitation;
use invitehub_entity::membership::{CreateMembership, MemberRole, MemberView, Membership};

/// Maps (invitation, user) to a role. Performs no authorization itself.
#[derive(Clone)]
pub struct MembershipRegistry {
    store: Arc<dyn MembershipStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for MembershipRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipRegistry").finish_non_exhaustive()
    }
}

impl MembershipRegistry {
    /// Creates a new registry.
    pub fn new(
        store: Arc<dyn MembershipStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { store, clock, ids }
    }

    /// Build the insert payload for a new grant.
    pub fn new_membership(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
        role: MemberRole,
    ) -> CreateMembership {
        CreateMembership {
            id: MembershipId::from_uuid(self.ids.new_uuid()),
            invitation_id,
            user_id,
            role,
            created_at: self.clock.now(),
        }
    }

    /// Register `user_id` as owner. Idempotent.
    pub async fn add_owner(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
    ) -> Result<Membership, AppError> {
        self.add_or_get_member(invitation_id, user_id, MemberRole::Owner)
            .await
    }

    /// Get-or-create. An existing membership keeps its role.
    pub async fn add_or_get_member(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
        role: MemberRole,
    ) -> Result<Membership, AppError> {
        let data = self.new_membership(invitation_id, user_id, role);
        let membership = self.store.insert_if_absent(&data).await?;

        if membership.id == data.id {
            info!(
                invitation_id = %invitation_id,
                user_id = %user_id,
                role = %membership.role,
                "Membership added"
            );
        } else {
            debug!(
                invitation_id = %invitation_id,
                user_id = %user_id,
                role = %membership.role,
                "Membership already present"
            );
        }
        Ok(membership)
    }

    /// The user's role on the invitation, if any.
    pub async fn role_of(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
    ) -> Result<Option<MemberRole>, AppError> {
        Ok(self
            .store
            .find(invitation_id, user_id)
            .await?
            .map(|m| m.role))
    }

    /// Whether the user created the invitation or manages its members.
    pub async fn is_owner_or_editor(
        &self,
        invitation: &Invitation,
        user_id: UserId,
    ) -> Result<bool, AppError> {
        if invitation.is_owned_by(user_id) {
            return Ok(true);
        }
        Ok(self
            .role_of(invitation.id, user_id)
            .await?
            .is_some_and(|role| role.can_manage_members()))
    }

    /// Drop every membership of an invitation.
    pub async fn remove_all(&self, invitation_id: InvitationId) -> Result<u64, AppError> {
        let removed = self.store.delete_for_invitation(invitation_id).await?;
        info!(invitation_id = %invitation_id, removed, "Memberships removed");
        Ok(removed)
    }

    /// Members with their profile, in join order.
    pub async fn list_members(
        &self,
        invitation_id: InvitationId,
    ) -> Result<Vec<MemberView>, AppError> {
        self.store.list_members(invitation_id).await
    }
}

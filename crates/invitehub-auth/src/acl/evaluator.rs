//! Access decisions over invitation ownership and membership.

use std::sync::Arc;

use tracing::warn;

use invitehub_core::error::AppError;
use invitehub_core::types::UserId;
use invitehub_entity::invitation::Invitation;

use super::registry::MembershipRegistry;

/// Answers "may this user do X to this invitation".
///
/// Callers check before invoking registries; nothing downstream re-checks.
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    registry: Arc<MembershipRegistry>,
}

impl AccessEvaluator {
    /// Creates a new evaluator backed by the membership registry.
    pub fn new(registry: Arc<MembershipRegistry>) -> Self {
        Self { registry }
    }

    /// Owner, or a member with the owner or editor role.
    ///
    /// Gates ticket issuance and listing, content updates and guest edits.
    pub async fn can_invite_or_edit_members(
        &self,
        invitation: &Invitation,
        user_id: UserId,
    ) -> Result<bool, AppError> {
        self.registry.is_owner_or_editor(invitation, user_id).await
    }

    /// Owner, or any member.
    pub async fn can_view(&self, invitation: &Invitation, user_id: UserId) -> Result<bool, AppError> {
        if invitation.is_owned_by(user_id) {
            return Ok(true);
        }
        Ok(self.registry.role_of(invitation.id, user_id).await?.is_some())
    }

    /// Only the creating user may delete.
    pub fn can_delete(&self, invitation: &Invitation, user_id: UserId) -> bool {
        invitation.is_owned_by(user_id)
    }

    pub async fn require_invite_or_edit_members(
        &self,
        invitation: &Invitation,
        user_id: UserId,
    ) -> Result<(), AppError> {
        if self.can_invite_or_edit_members(invitation, user_id).await? {
            return Ok(());
        }
        warn!(invitation_id = %invitation.id, user_id = %user_id, "Edit access denied");
        Err(AppError::permission_denied(
            "Only the owner or an editor can manage this invitation",
        ))
    }

    pub async fn require_view(
        &self,
        invitation: &Invitation,
        user_id: UserId,
    ) -> Result<(), AppError> {
        if self.can_view(invitation, user_id).await? {
            return Ok(());
        }
        warn!(invitation_id = %invitation.id, user_id = %user_id, "View access denied");
        Err(AppError::permission_denied(
            "You do not have access to this invitation",
        ))
    }

    pub fn require_delete(&self, invitation: &Invitation, user_id: UserId) -> Result<(), AppError> {
        if self.can_delete(invitation, user_id) {
            return Ok(());
        }
        warn!(invitation_id = %invitation.id, user_id = %user_id, "Delete access denied");
        Err(AppError::permission_denied(
            "Only the owner can delete this invitation",
        ))
    }
}

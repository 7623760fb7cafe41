//! Collaboration service: authorization in front of lifecycle, tickets and memberships.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use invitehub_auth::{AccessEvaluator, MembershipRegistry};
use invitehub_core::error::AppError;
use invitehub_core::types::InvitationId;
use invitehub_entity::invitation::Invitation;
use invitehub_entity::membership::{MemberRole, MemberView};
use invitehub_entity::ticket::{PendingInvite, TicketSummary};

use crate::context::RequestContext;
use crate::lifecycle::{InvitationChanges, InvitationLifecycle, NewInvitation};
use crate::ticket::{IssuedTicket, TicketRegistry};

/// An invitation with its collaborators, as seen by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationDetail {
    #[serde(flatten)]
    pub invitation: Invitation,
    /// Always present, possibly empty.
    pub members: Vec<MemberView>,
    /// Filled only for owners and editors.
    pub tickets: Vec<TicketSummary>,
    /// The viewer's own role, if a member.
    pub my_role: Option<MemberRole>,
}

/// Outcome of redeeming an invite token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResult {
    pub invitation_id: InvitationId,
    pub slug: String,
    /// Effective role, which may be a pre-existing one.
    pub role: MemberRole,
}

/// Invitation collaboration operations.
#[derive(Debug, Clone)]
pub struct CollaborationService {
    lifecycle: Arc<InvitationLifecycle>,
    tickets: Arc<TicketRegistry>,
    registry: Arc<MembershipRegistry>,
    evaluator: Arc<AccessEvaluator>,
    ticket_ttl: Duration,
}

impl CollaborationService {
    /// Creates a new collaboration service.
    pub fn new(
        lifecycle: Arc<InvitationLifecycle>,
        tickets: Arc<TicketRegistry>,
        registry: Arc<MembershipRegistry>,
        evaluator: Arc<AccessEvaluator>,
        ticket_ttl: Duration,
    ) -> Self {
        Self {
            lifecycle,
            tickets,
            registry,
            evaluator,
            ticket_ttl,
        }
    }

    /// Create an invitation owned by the caller.
    pub async fn create_invitation(
        &self,
        ctx: &RequestContext,
        req: NewInvitation,
    ) -> Result<Invitation, AppError> {
        self.lifecycle.create(ctx.user_id, req).await
    }

    /// Invitations the caller owns or belongs to, after purging expired ones.
    pub async fn list_invitations(&self, ctx: &RequestContext) -> Result<Vec<Invitation>, AppError> {
        self.lifecycle.list_for(ctx.user_id).await
    }

    /// Full view of one invitation.
    pub async fn get_invitation(
        &self,
        ctx: &RequestContext,
        invitation_id: InvitationId,
    ) -> Result<InvitationDetail, AppError> {
        let invitation = self.lifecycle.get_visible(invitation_id, ctx.user_id).await?;
        self.evaluator.require_view(&invitation, ctx.user_id).await?;

        let members = self.registry.list_members(invitation.id).await?;
        let my_role = members
            .iter()
            .find(|m| m.user_id == ctx.user_id)
            .map(|m| m.role);
        let tickets = if self
            .evaluator
            .can_invite_or_edit_members(&invitation, ctx.user_id)
            .await?
        {
            self.tickets.list_for_invitation(invitation.id).await?
        } else {
            Vec::new()
        };

        Ok(InvitationDetail {
            invitation,
            members,
            tickets,
            my_role,
        })
    }

    /// Replace content. Owner or editor.
    pub async fn update_invitation(
        &self,
        ctx: &RequestContext,
        invitation_id: InvitationId,
        changes: InvitationChanges,
    ) -> Result<Invitation, AppError> {
        let invitation = self.lifecycle.get_visible(invitation_id, ctx.user_id).await?;
        self.evaluator
            .require_invite_or_edit_members(&invitation, ctx.user_id)
            .await?;
        self.lifecycle.update(&invitation, changes).await
    }

    /// Delete the invitation and everything attached. Owner only.
    pub async fn delete_invitation(
        &self,
        ctx: &RequestContext,
        invitation_id: InvitationId,
    ) -> Result<(), AppError> {
        let invitation = self.lifecycle.get_visible(invitation_id, ctx.user_id).await?;
        self.evaluator.require_delete(&invitation, ctx.user_id)?;
        self.lifecycle.delete(invitation.id).await?;
        info!(invitation_id = %invitation_id, user_id = %ctx.user_id, "Invitation removed by owner");
        Ok(())
    }

    /// Extend or shorten an invitation's life. Invoked by the payment flow.
    pub async fn renew_invitation(
        &self,
        invitation_id: InvitationId,
        new_expiry: DateTime<Utc>,
    ) -> Result<Invitation, AppError> {
        self.lifecycle.renew(invitation_id, new_expiry).await
    }

    /// Issue an invite ticket. Owner or editor.
    pub async fn issue_ticket(
        &self,
        ctx: &RequestContext,
        invitation_id: InvitationId,
        invitee_email: &str,
        role: MemberRole,
    ) -> Result<IssuedTicket, AppError> {
        let invitation = self.lifecycle.get_visible(invitation_id, ctx.user_id).await?;
        self.evaluator
            .require_invite_or_edit_members(&invitation, ctx.user_id)
            .await?;

        self.tickets
            .issue(invitation.id, ctx.user_id, invitee_email, role, self.ticket_ttl)
            .await
    }

    /// Redeem an invite token as the authenticated caller.
    pub async fn join_by_token(
        &self,
        ctx: &RequestContext,
        raw_token: &str,
    ) -> Result<JoinResult, AppError> {
        if raw_token.trim().is_empty() {
            return Err(AppError::validation("Token is required"));
        }

        let membership = self
            .tickets
            .claim(raw_token, ctx.user_id, &ctx.email)
            .await?;
        let invitation = self
            .lifecycle
            .get_visible(membership.invitation_id, ctx.user_id)
            .await?;

        Ok(JoinResult {
            invitation_id: invitation.id,
            slug: invitation.slug,
            role: membership.role,
        })
    }

    /// Pending invites addressed to the caller's verified email.
    pub async fn list_pending_invites(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<PendingInvite>, AppError> {
        self.lifecycle.purge_before_read(ctx.user_id).await;
        self.tickets.list_pending_for_email(&ctx.email).await
    }

    /// Members of an invitation the caller can view.
    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        invitation_id: InvitationId,
    ) -> Result<Vec<MemberView>, AppError> {
        let invitation = self.lifecycle.get_visible(invitation_id, ctx.user_id).await?;
        self.evaluator.require_view(&invitation, ctx.user_id).await?;
        self.registry.list_members(invitation.id).await
    }

    /// Tickets of an invitation. Owner or editor.
    pub async fn list_tickets(
        &self,
        ctx: &RequestContext,
        invitation_id: InvitationId,
    ) -> Result<Vec<TicketSummary>, AppError> {
        let invitation = self.lifecycle.get_visible(invitation_id, ctx.user_id).await?;
        self.evaluator
            .require_invite_or_edit_members(&invitation, ctx.user_id)
            .await?;
        self.tickets.list_for_invitation(invitation.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, content};
    use invitehub_core::traits::Clock;
    use invitehub_core::error::ErrorKind;
    use invitehub_database::store::InvitationStore;
    use invitehub_entity::ticket::TicketState;

    async fn created(h: &Harness, ctx: &RequestContext) -> Invitation {
        h.collaboration
            .create_invitation(ctx, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_invite_then_join() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let r = created(&h, &a).await;

        let issued = h
            .collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Editor)
            .await
            .unwrap();
        assert!(!issued.token.is_empty());
        let joined = h.collaboration.join_by_token(&b, &issued.token).await.unwrap();
        assert_eq!(
            joined,
            JoinResult { invitation_id: r.id, slug: r.slug.clone(), role: MemberRole::Editor }
        );

        let members = h.collaboration.list_members(&a, r.id).await.unwrap();
        let roles: Vec<_> = members.iter().map(|m| (m.user_id, m.role)).collect();
        assert_eq!(roles, vec![(a.user_id, MemberRole::Owner), (b.user_id, MemberRole::Editor)]);

        let err = h.collaboration.join_by_token(&b, &issued.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOrExpiredToken);
    }

    #[tokio::test]
    async fn test_wrong_identity_cannot_join() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let c = h.ctx("carol").await;
        let r = created(&h, &a).await;

        let issued = h
            .collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Editor)
            .await
            .unwrap();
        let err = h.collaboration.join_by_token(&c, &issued.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::IdentityMismatch);
        assert!(err.message.contains(&b.email));

        let members = h.collaboration.list_members(&a, r.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, a.user_id);
    }

    #[tokio::test]
    async fn test_expired_invitation_disappears_from_listing() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let r = created(&h, &a).await;

        h.collaboration
            .renew_invitation(r.id, h.clock.now() - Duration::seconds(1))
            .await
            .unwrap();

        let listed = h.collaboration.list_invitations(&a).await.unwrap();
        assert!(listed.iter().all(|i| i.id != r.id));
        assert!(InvitationStore::find_by_id(&h.store, r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pending_listing_purges_callers_expired_invitations() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let r = created(&h, &a).await;
        let issued_to_alice = {
            let other = created(&h, &b).await;
            h.collaboration
                .issue_ticket(&b, other.id, &a.email, MemberRole::Viewer)
                .await
                .unwrap()
        };

        h.collaboration
            .renew_invitation(r.id, h.clock.now() - Duration::seconds(1))
            .await
            .unwrap();

        let pending = h.collaboration.list_pending_invites(&a).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].ticket_id, issued_to_alice.ticket.id);
        assert!(InvitationStore::find_by_id(&h.store, r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_member_sees_shared_invitation() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let r = created(&h, &a).await;

        assert!(h.collaboration.list_invitations(&b).await.unwrap().is_empty());
        let issued = h
            .collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Viewer)
            .await
            .unwrap();
        h.collaboration.join_by_token(&b, &issued.token).await.unwrap();

        let listed = h.collaboration.list_invitations(&b).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, r.id);
    }

    #[tokio::test]
    async fn test_detail_hides_tickets_from_viewers() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let r = created(&h, &a).await;
        let issued = h
            .collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Viewer)
            .await
            .unwrap();
        h.collaboration.join_by_token(&b, &issued.token).await.unwrap();
        h.collaboration
            .issue_ticket(&a, r.id, "dave@x.com", MemberRole::Editor)
            .await
            .unwrap();

        let owner_view = h.collaboration.get_invitation(&a, r.id).await.unwrap();
        assert_eq!(owner_view.my_role, Some(MemberRole::Owner));
        assert_eq!(owner_view.members.len(), 2);
        assert_eq!(owner_view.tickets.len(), 2);
        assert!(owner_view.tickets.iter().any(|t| t.state == TicketState::Claimed));

        let viewer_view = h.collaboration.get_invitation(&b, r.id).await.unwrap();
        assert_eq!(viewer_view.my_role, Some(MemberRole::Viewer));
        assert_eq!(viewer_view.members.len(), 2);
        assert!(viewer_view.tickets.is_empty());
    }

    #[tokio::test]
    async fn test_permissions_are_enforced() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let stranger = h.ctx("eve").await;
        let r = created(&h, &a).await;
        let issued = h
            .collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Viewer)
            .await
            .unwrap();
        h.collaboration.join_by_token(&b, &issued.token).await.unwrap();

        let err = h
            .collaboration
            .issue_ticket(&b, r.id, "x@x.com", MemberRole::Viewer)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = h.collaboration.list_tickets(&b, r.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = h.collaboration.get_invitation(&stranger, r.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = h.collaboration.delete_invitation(&b, r.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

    }

    #[tokio::test]
    async fn test_owner_ticket_grants_owner_role_but_not_deletion() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let r = created(&h, &a).await;

        let issued = h
            .collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Owner)
            .await
            .unwrap();
        let joined = h.collaboration.join_by_token(&b, &issued.token).await.unwrap();
        assert_eq!(joined.role, MemberRole::Owner);
        assert_eq!(
            h.registry.role_of(r.id, b.user_id).await.unwrap(),
            Some(MemberRole::Owner)
        );

        let evaluator = AccessEvaluator::new(h.registry.clone());
        assert!(evaluator.can_invite_or_edit_members(&r, b.user_id).await.unwrap());
        assert!(!evaluator.can_delete(&r, b.user_id));
        let err = h.collaboration.delete_invitation(&b, r.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(h.collaboration.get_invitation(&a, r.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_editor_can_invite_and_edit() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let r = created(&h, &a).await;
        let issued = h
            .collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Editor)
            .await
            .unwrap();
        h.collaboration.join_by_token(&b, &issued.token).await.unwrap();

        h.collaboration
            .issue_ticket(&b, r.id, "carol@x.com", MemberRole::Viewer)
            .await
            .unwrap();
        assert_eq!(h.collaboration.list_tickets(&b, r.id).await.unwrap().len(), 2);

        let mut changed = content();
        changed.sentence_opening = "Bismillah".into();
        let updated = h
            .collaboration
            .update_invitation(
                &b,
                r.id,
                InvitationChanges { content: changed, ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.content.sentence_opening, "Bismillah");
    }

    #[tokio::test]
    async fn test_pending_invites_follow_the_caller_email() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let r = created(&h, &a).await;
        h.collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Viewer)
            .await
            .unwrap();

        assert_eq!(h.collaboration.list_pending_invites(&b).await.unwrap().len(), 1);
        assert!(h.collaboration.list_pending_invites(&a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_deletes_everything() {
        let h = Harness::new().await;
        let a = h.ctx("alice").await;
        let b = h.ctx("bob").await;
        let r = created(&h, &a).await;
        h.collaboration
            .issue_ticket(&a, r.id, &b.email, MemberRole::Viewer)
            .await
            .unwrap();

        h.collaboration.delete_invitation(&a, r.id).await.unwrap();
        let err = h.collaboration.get_invitation(&a, r.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(h.collaboration.list_pending_invites(&b).await.unwrap().is_empty());
    }
}

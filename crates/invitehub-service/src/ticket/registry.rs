//! Ticket registry: pending invitations, issued and claimed.
//!
//! Authorization happens before these methods are called. The registry
//! only enforces token validity and identity binding.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use invitehub_auth::{MembershipRegistry, TokenCodec};
use invitehub_core::error::AppError;
use invitehub_core::traits::{Clock, IdGenerator};
use invitehub_core::types::{InvitationId, TicketId, UserId};
use invitehub_database::store::TicketStore;
use invitehub_entity::membership::{MemberRole, Membership};
use invitehub_entity::ticket::{CreateTicket, PendingInvite, TicketSummary};

use crate::email::{normalize_email, parse_email};

/// Issuance result. The only place a raw token is ever returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedTicket {
    /// Raw invite token for the inviter to pass on.
    pub token: String,
    pub ticket: TicketSummary,
}

/// Issues and claims invite tickets.
#[derive(Clone)]
pub struct TicketRegistry {
    store: Arc<dyn TicketStore>,
    registry: Arc<MembershipRegistry>,
    codec: TokenCodec,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for TicketRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketRegistry")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl TicketRegistry {
    /// Creates a new ticket registry.
    pub fn new(
        store: Arc<dyn TicketStore>,
        registry: Arc<MembershipRegistry>,
        codec: TokenCodec,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            registry,
            codec,
            clock,
            ids,
        }
    }

    /// Issue a ticket offering `role` to `invitee_email` for `ttl`.
    pub async fn issue(
        &self,
        invitation_id: InvitationId,
        inviter_id: UserId,
        invitee_email: &str,
        role: MemberRole,
        ttl: Duration,
    ) -> Result<IssuedTicket, AppError> {
        let email = parse_email(invitee_email)?;
        let (token, digest) = self.codec.issue().into_parts();
        let now = self.clock.now();

        let ticket = self
            .store
            .create(&CreateTicket {
                id: TicketId::from_uuid(self.ids.new_uuid()),
                invitation_id,
                email,
                role,
                token_digest: digest.into_string(),
                expires_at: now + ttl,
                invited_by: inviter_id,
                created_at: now,
            })
            .await?;

        info!(
            ticket_id = %ticket.id,
            invitation_id = %invitation_id,
            invited_by = %inviter_id,
            role = %role,
            expires_at = %ticket.expires_at,
            "Invite ticket issued"
        );

        Ok(IssuedTicket {
            token,
            ticket: ticket.summarize(now),
        })
    }

    /// Redeem `raw_token` for the claimant, returning the effective membership.
    ///
    /// Unknown, expired and already-claimed tokens all fail the same way.
    pub async fn claim(
        &self,
        raw_token: &str,
        claimant_id: UserId,
        claimant_email: &str,
    ) -> Result<Membership, AppError> {
        let digest = TokenCodec::digest_of(raw_token.trim());
        let now = self.clock.now();

        let Some(ticket) = self
            .store
            .find_usable_by_digest(digest.as_str(), now)
            .await?
        else {
            debug!(user_id = %claimant_id, "No usable ticket for presented token");
            return Err(AppError::invalid_or_expired_token());
        };

        let claimant_email = normalize_email(claimant_email);
        if ticket.email != claimant_email {
            warn!(
                ticket_id = %ticket.id,
                user_id = %claimant_id,
                "Ticket presented by a different identity"
            );
            return Err(AppError::identity_mismatch(&ticket.email, &claimant_email));
        }

        let membership = self
            .registry
            .new_membership(ticket.invitation_id, claimant_id, ticket.role);
        let Some(effective) = self.store.claim(ticket.id, now, &membership).await? else {
            debug!(ticket_id = %ticket.id, "Ticket claimed concurrently or expired");
            return Err(AppError::invalid_or_expired_token());
        };

        info!(
            ticket_id = %ticket.id,
            invitation_id = %ticket.invitation_id,
            user_id = %claimant_id,
            role = %effective.role,
            "Invite ticket claimed"
        );
        Ok(effective)
    }

    /// Pending invites addressed to `email`. Never includes tokens.
    pub async fn list_pending_for_email(
        &self,
        email: &str,
    ) -> Result<Vec<PendingInvite>, AppError> {
        self.store
            .list_pending_for_email(&normalize_email(email), self.clock.now())
            .await
    }

    /// Every ticket of an invitation with its current state.
    pub async fn list_for_invitation(
        &self,
        invitation_id: InvitationId,
    ) -> Result<Vec<TicketSummary>, AppError> {
        let now = self.clock.now();
        Ok(self
            .store
            .list_for_invitation(invitation_id)
            .await?
            .iter()
            .map(|t| t.summarize(now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::NewInvitation;
    use crate::testing::{Harness, content};
    use invitehub_core::error::ErrorKind;
    use invitehub_entity::ticket::TicketState;

    #[tokio::test]
    async fn test_issue_normalizes_and_hides_digest() {
        let h = Harness::new().await;
        let alice = h.user("alice").await;
        let inv = h
            .lifecycle
            .create(alice.id, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap();

        let issued = h
            .tickets
            .issue(inv.id, alice.id, "  Bob@X.com ", MemberRole::Editor, Duration::hours(24))
            .await
            .unwrap();

        assert_eq!(issued.ticket.email, "bob@x.com");
        assert_eq!(issued.ticket.state, TicketState::Pending);
        assert_eq!(issued.ticket.expires_at, h.clock.now() + Duration::hours(24));
        let json = serde_json::to_string(&issued.ticket).unwrap();
        assert!(!json.contains(&issued.token));
        assert!(!json.contains(TokenCodec::digest_of(&issued.token).as_str()));
    }

    #[tokio::test]
    async fn test_issue_rejects_bad_email() {
        let h = Harness::new().await;
        let alice = h.user("alice").await;
        let inv = h
            .lifecycle
            .create(alice.id, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap();

        let err = h
            .tickets
            .issue(inv.id, alice.id, "bob", MemberRole::Viewer, Duration::hours(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_claim_binds_identity() {
        let h = Harness::new().await;
        let alice = h.user("alice").await;
        let bob = h.user("bob").await;
        let carol = h.user("carol").await;
        let inv = h
            .lifecycle
            .create(alice.id, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap();
        let issued = h
            .tickets
            .issue(inv.id, alice.id, &bob.email, MemberRole::Editor, Duration::hours(24))
            .await
            .unwrap();

        let err = h
            .tickets
            .claim(&issued.token, carol.id, &carol.email)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::IdentityMismatch);
        assert!(err.message.contains(&bob.email));
        assert!(h.registry.role_of(inv.id, carol.id).await.unwrap().is_none());

        // Case and whitespace differences are not a mismatch.
        let membership = h
            .tickets
            .claim(&issued.token, bob.id, &bob.email.to_uppercase())
            .await
            .unwrap();
        assert_eq!(membership.role, MemberRole::Editor);
        assert_eq!(
            h.registry.role_of(inv.id, bob.id).await.unwrap(),
            Some(MemberRole::Editor)
        );

        let states: Vec<_> = h
            .tickets
            .list_for_invitation(inv.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.state)
            .collect();
        assert_eq!(states, vec![TicketState::Claimed]);
    }

    #[tokio::test]
    async fn test_double_claim_fails_second_time() {
        let h = Harness::new().await;
        let alice = h.user("alice").await;
        let bob = h.user("bob").await;
        let inv = h
            .lifecycle
            .create(alice.id, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap();
        let issued = h
            .tickets
            .issue(inv.id, alice.id, &bob.email, MemberRole::Viewer, Duration::hours(24))
            .await
            .unwrap();

        h.tickets.claim(&issued.token, bob.id, &bob.email).await.unwrap();
        let err = h
            .tickets
            .claim(&issued.token, bob.id, &bob.email)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOrExpiredToken);
    }

    #[tokio::test]
    async fn test_concurrent_claims_succeed_once() {
        let h = Harness::new().await;
        let alice = h.user("alice").await;
        let bob = h.user("bob").await;
        let inv = h
            .lifecycle
            .create(alice.id, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap();
        let issued = h
            .tickets
            .issue(inv.id, alice.id, &bob.email, MemberRole::Editor, Duration::hours(24))
            .await
            .unwrap();

        let attempts = (0..8).map(|_| {
            let tickets = h.tickets.clone();
            let token = issued.token.clone();
            let email = bob.email.clone();
            let user_id = bob.id;
            tokio::spawn(async move { tickets.claim(&token, user_id, &email).await })
        });
        let results: Vec<_> = futures::future::join_all(attempts)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| e.kind == ErrorKind::InvalidOrExpiredToken)
        );
        assert_eq!(h.registry.list_members(inv.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_expired_ticket_cannot_be_claimed() {
        let h = Harness::new().await;
        let alice = h.user("alice").await;
        let bob = h.user("bob").await;
        let inv = h
            .lifecycle
            .create(alice.id, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap();
        let issued = h
            .tickets
            .issue(inv.id, alice.id, &bob.email, MemberRole::Editor, Duration::hours(1))
            .await
            .unwrap();

        h.clock.advance(Duration::hours(1));
        let err = h
            .tickets
            .claim(&issued.token, bob.id, &bob.email)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOrExpiredToken);
        assert!(h.registry.role_of(inv.id, bob.id).await.unwrap().is_none());

        let summaries = h.tickets.list_for_invitation(inv.id).await.unwrap();
        assert_eq!(summaries[0].state, TicketState::Expired);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let h = Harness::new().await;
        let bob = h.user("bob").await;
        let err = h
            .tickets
            .claim("definitely-not-issued", bob.id, &bob.email)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOrExpiredToken);
    }

    #[tokio::test]
    async fn test_existing_membership_role_wins_on_claim() {
        let h = Harness::new().await;
        let alice = h.user("alice").await;
        let bob = h.user("bob").await;
        let inv = h
            .lifecycle
            .create(alice.id, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap();
        h.registry
            .add_or_get_member(inv.id, bob.id, MemberRole::Viewer)
            .await
            .unwrap();
        let issued = h
            .tickets
            .issue(inv.id, alice.id, &bob.email, MemberRole::Editor, Duration::hours(24))
            .await
            .unwrap();

        let membership = h.tickets.claim(&issued.token, bob.id, &bob.email).await.unwrap();
        assert_eq!(membership.role, MemberRole::Viewer);
    }

    #[tokio::test]
    async fn test_pending_listing() {
        let h = Harness::new().await;
        let alice = h.user("alice").await;
        let bob = h.user("bob").await;
        let inv = h
            .lifecycle
            .create(alice.id, NewInvitation { content: content(), ..Default::default() })
            .await
            .unwrap();
        let issued = h
            .tickets
            .issue(inv.id, alice.id, &bob.email, MemberRole::Editor, Duration::hours(24))
            .await
            .unwrap();

        let pending = h.tickets.list_pending_for_email("BOB@x.com").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].owner_username, "alice");
        assert_eq!(pending[0].groom_name, "Adam");
        let json = serde_json::to_string(&pending).unwrap();
        assert!(!json.contains(&issued.token));

        h.tickets.claim(&issued.token, bob.id, &bob.email).await.unwrap();
        assert!(h.tickets.list_pending_for_email(&bob.email).await.unwrap().is_empty());
    }
}

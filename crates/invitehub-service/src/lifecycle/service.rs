//! Resource lifecycle manager.
//!
//! Expiry is discovered lazily: every read scoped to a user first purges
//! that user's lapsed invitations, and every read query also filters on
//! `expires_at` so a failed purge never serves expired data.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use invitehub_auth::MembershipRegistry;
use invitehub_core::error::AppError;
use invitehub_core::traits::{Clock, IdGenerator};
use invitehub_core::types::{InvitationId, UserId};
use invitehub_database::store::InvitationStore;
use invitehub_entity::invitation::{CreateInvitation, Invitation, InvitationContent, UpdateInvitation};
use invitehub_entity::membership::MemberRole;

use crate::slug::{hex_suffix, slugify};

/// Attempts at finding a free suffixed slug before giving up.
const SLUG_ATTEMPTS: usize = 5;

/// Input for a new invitation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInvitation {
    pub content: InvitationContent,
    /// Explicit slug. Generated from the couple's names when absent.
    pub slug: Option<String>,
    pub theme_id: Option<String>,
    pub song_id: Option<String>,
    /// Explicit expiry. Defaults to now plus the grace period.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Wholesale replacement of an invitation's editable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvitationChanges {
    pub content: InvitationContent,
    /// `None` keeps the slug, `Some("")` regenerates it.
    pub slug: Option<String>,
    pub theme_id: Option<String>,
    pub song_id: Option<String>,
}

/// Creates invitations and expires them lazily.
#[derive(Clone)]
pub struct InvitationLifecycle {
    store: Arc<dyn InvitationStore>,
    registry: Arc<MembershipRegistry>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    grace: Duration,
}

impl std::fmt::Debug for InvitationLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationLifecycle")
            .field("grace", &self.grace)
            .finish_non_exhaustive()
    }
}

impl InvitationLifecycle {
    /// Creates a new lifecycle manager.
    pub fn new(
        store: Arc<dyn InvitationStore>,
        registry: Arc<MembershipRegistry>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        grace: Duration,
    ) -> Self {
        Self {
            store,
            registry,
            clock,
            ids,
            grace,
        }
    }

    /// Create an invitation owned by `owner_id`, registering the owner
    /// membership in the same transaction.
    pub async fn create(&self, owner_id: UserId, req: NewInvitation) -> Result<Invitation, AppError> {
        validate_content(&req.content)?;

        let now = self.clock.now();
        let expires_at = req.expires_at.unwrap_or(now + self.grace);
        let slug = match req.slug.as_deref().map(slugify) {
            Some(slug) if !slug.is_empty() => slug,
            _ => self.unique_slug(&req.content, None).await?,
        };

        let id = InvitationId::from_uuid(self.ids.new_uuid());
        let data = CreateInvitation {
            id,
            owner_id,
            slug,
            theme_id: req.theme_id,
            song_id: req.song_id,
            content: req.content,
            created_at: now,
            expires_at,
        };
        let owner = self.registry.new_membership(id, owner_id, MemberRole::Owner);

        let invitation = self.store.create_with_owner(&data, &owner).await?;
        info!(
            invitation_id = %invitation.id,
            owner_id = %owner_id,
            slug = %invitation.slug,
            expires_at = %invitation.expires_at,
            "Invitation created"
        );
        Ok(invitation)
    }

    /// Delete every invitation `user_id` owns whose expiry has passed.
    pub async fn purge_expired_for(&self, user_id: UserId) -> Result<u64, AppError> {
        let purged = self
            .store
            .delete_expired_for_owner(user_id, self.clock.now())
            .await?;
        if purged > 0 {
            info!(user_id = %user_id, purged, "Expired invitations purged");
        }
        Ok(purged)
    }

    /// Purge, logging instead of failing. Reads still filter on expiry.
    pub async fn purge_before_read(&self, user_id: UserId) {
        if let Err(e) = self.purge_expired_for(user_id).await {
            warn!(user_id = %user_id, error = %e, "Lazy purge failed; continuing with filtered read");
        }
    }

    /// Set `expires_at` verbatim. Called after a successful payment.
    pub async fn renew(
        &self,
        invitation_id: InvitationId,
        new_expiry: DateTime<Utc>,
    ) -> Result<Invitation, AppError> {
        let invitation = self
            .store
            .set_expiry(invitation_id, new_expiry)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invitation {invitation_id} not found")))?;
        info!(invitation_id = %invitation_id, expires_at = %new_expiry, "Invitation renewed");
        Ok(invitation)
    }

    /// Load a live invitation after purging the caller's expired ones.
    ///
    /// Says nothing about whether the caller may see it.
    pub async fn get_visible(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
    ) -> Result<Invitation, AppError> {
        self.purge_before_read(user_id).await;
        debug!(invitation_id = %invitation_id, user_id = %user_id, "Loading invitation");
        self.store
            .find_live_by_id(invitation_id, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invitation {invitation_id} not found")))
    }

    /// Live invitations the user owns or belongs to.
    pub async fn list_for(&self, user_id: UserId) -> Result<Vec<Invitation>, AppError> {
        self.purge_before_read(user_id).await;
        self.store.list_live_for_user(user_id, self.clock.now()).await
    }

    /// Replace content and catalog references.
    pub async fn update(
        &self,
        invitation: &Invitation,
        changes: InvitationChanges,
    ) -> Result<Invitation, AppError> {
        validate_content(&changes.content)?;

        let slug = match changes.slug.as_deref() {
            None => invitation.slug.clone(),
            Some(raw) if raw.trim().is_empty() => {
                self.unique_slug(&changes.content, Some(&invitation.slug))
                    .await?
            }
            Some(raw) => {
                let slug = slugify(raw);
                if slug.is_empty() {
                    return Err(AppError::validation("Slug must contain letters or digits"));
                }
                slug
            }
        };

        let data = UpdateInvitation {
            slug,
            theme_id: changes.theme_id,
            song_id: changes.song_id,
            content: changes.content,
        };
        let updated = self
            .store
            .update(invitation.id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invitation {} not found", invitation.id)))?;
        info!(invitation_id = %updated.id, slug = %updated.slug, "Invitation updated");
        Ok(updated)
    }

    /// Physically delete an invitation and everything it owns.
    pub async fn delete(&self, invitation_id: InvitationId) -> Result<(), AppError> {
        if !self.store.delete(invitation_id).await? {
            return Err(AppError::not_found(format!(
                "Invitation {invitation_id} not found"
            )));
        }
        info!(invitation_id = %invitation_id, "Invitation deleted");
        Ok(())
    }

    /// `groom-bride`, suffixed with 8 hex chars while taken.
    ///
    /// `current` is the invitation's own slug, which never counts as taken.
    async fn unique_slug(
        &self,
        content: &InvitationContent,
        current: Option<&str>,
    ) -> Result<String, AppError> {
        let mut base = slugify(&format!("{}-{}", content.groom_name, content.bride_name));
        if base.is_empty() {
            base = "invitation".to_string();
        }

        if current == Some(base.as_str()) || !self.store.slug_exists(&base).await? {
            return Ok(base);
        }
        for _ in 0..SLUG_ATTEMPTS {
            let candidate = format!("{base}-{}", hex_suffix(self.ids.as_ref(), 8));
            if !self.store.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::conflict(format!(
            "Could not find a free slug for '{base}'"
        )))
    }
}

fn validate_content(content: &InvitationContent) -> Result<(), AppError> {
    let missing = content.missing_required_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

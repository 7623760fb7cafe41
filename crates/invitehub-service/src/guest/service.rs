//! Guest CRUD service.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use invitehub_auth::AccessEvaluator;
use invitehub_core::error::{AppError, ErrorKind};
use invitehub_core::traits::{Clock, IdGenerator};
use invitehub_core::types::{GuestId, InvitationId};
use invitehub_database::store::GuestStore;
use invitehub_entity::guest::{CreateGuest, Guest, GuestKind};
use invitehub_entity::invitation::Invitation;

use crate::context::RequestContext;
use crate::email::parse_email;
use crate::lifecycle::InvitationLifecycle;
use crate::slug::{hex_suffix, slugify};

/// Request to add a guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
    pub invitation_id: InvitationId,
    pub name: String,
    /// Generated from the name when absent.
    pub slug: Option<String>,
    #[serde(default)]
    pub kind: GuestKind,
    #[serde(default)]
    pub whatsapp: String,
    pub email: Option<String>,
    pub pax_request: Option<i32>,
}

/// Manages guests of invitations the caller collaborates on.
#[derive(Clone)]
pub struct GuestService {
    store: Arc<dyn GuestStore>,
    lifecycle: Arc<InvitationLifecycle>,
    evaluator: Arc<AccessEvaluator>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for GuestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestService").finish_non_exhaustive()
    }
}

impl GuestService {
    /// Creates a new guest service.
    pub fn new(
        store: Arc<dyn GuestStore>,
        lifecycle: Arc<InvitationLifecycle>,
        evaluator: Arc<AccessEvaluator>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            lifecycle,
            evaluator,
            clock,
            ids,
        }
    }

    /// Guests of an invitation the caller can view, ordered by name.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        invitation_id: InvitationId,
    ) -> Result<Vec<Guest>, AppError> {
        let invitation = self.lifecycle.get_visible(invitation_id, ctx.user_id).await?;
        self.evaluator.require_view(&invitation, ctx.user_id).await?;
        self.store.list_for_invitation(invitation.id).await
    }

    /// Add one guest. Owner or editor of the target invitation.
    pub async fn create(&self, ctx: &RequestContext, req: NewGuest) -> Result<Guest, AppError> {
        let mut created = self.bulk_create(ctx, vec![req]).await?;
        created
            .pop()
            .ok_or_else(|| AppError::internal("Guest insert returned no row"))
    }

    /// Add many guests at once, all or nothing.
    ///
    /// Every request is validated and every distinct invitation authorized
    /// before anything is written.
    pub async fn bulk_create(
        &self,
        ctx: &RequestContext,
        reqs: Vec<NewGuest>,
    ) -> Result<Vec<Guest>, AppError> {
        if reqs.is_empty() {
            return Err(AppError::validation("At least one guest is required"));
        }
        for req in &reqs {
            validate(req)?;
        }

        let mut invitations: HashMap<InvitationId, Invitation> = HashMap::new();
        for req in &reqs {
            if invitations.contains_key(&req.invitation_id) {
                continue;
            }
            let invitation = self
                .lifecycle
                .get_visible(req.invitation_id, ctx.user_id)
                .await?;
            self.evaluator
                .require_invite_or_edit_members(&invitation, ctx.user_id)
                .await?;
            invitations.insert(invitation.id, invitation);
        }

        let now = self.clock.now();
        let mut taken: HashSet<(InvitationId, String)> = HashSet::new();
        let mut rows = Vec::with_capacity(reqs.len());
        for req in reqs {
            let slug = self.guest_slug(&req, &mut taken).await?;
            rows.push(CreateGuest {
                id: GuestId::from_uuid(self.ids.new_uuid()),
                invitation_id: req.invitation_id,
                name: req.name.trim().to_string(),
                slug,
                kind: req.kind,
                whatsapp: req.whatsapp.trim().to_string(),
                email: req.email.as_deref().map(parse_email).transpose()?,
                pax_request: req.pax_request,
                created_at: now,
            });
        }

        let created = self.store.create_many(&rows).await?;
        info!(
            user_id = %ctx.user_id,
            invitations = invitations.len(),
            count = created.len(),
            "Guests created"
        );
        Ok(created)
    }

    /// Delete the listed guests the caller may edit. Returns how many went.
    pub async fn bulk_delete(
        &self,
        ctx: &RequestContext,
        ids: Vec<GuestId>,
    ) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Err(AppError::validation("No guest ids given"));
        }

        let guests = self.store.find_by_ids(&ids).await?;
        let mut editable: HashMap<InvitationId, bool> = HashMap::new();
        let mut deletable = Vec::with_capacity(guests.len());
        for guest in guests {
            let allowed = match editable.get(&guest.invitation_id) {
                Some(allowed) => *allowed,
                None => {
                    let allowed = match self
                        .lifecycle
                        .get_visible(guest.invitation_id, ctx.user_id)
                        .await
                    {
                        Ok(invitation) => {
                            self.evaluator
                                .can_invite_or_edit_members(&invitation, ctx.user_id)
                                .await?
                        }
                        Err(e) if e.is(ErrorKind::NotFound) => false,
                        Err(e) => return Err(e),
                    };
                    editable.insert(guest.invitation_id, allowed);
                    allowed
                }
            };
            if allowed {
                deletable.push(guest.id);
            }
        }

        if deletable.is_empty() {
            return Ok(0);
        }
        let deleted = self.store.delete_many(&deletable).await?;
        info!(user_id = %ctx.user_id, requested = ids.len(), deleted, "Guests deleted");
        Ok(deleted)
    }

    /// Requested slug, or the slugified name plus 6 hex chars.
    async fn guest_slug(
        &self,
        req: &NewGuest,
        taken: &mut HashSet<(InvitationId, String)>,
    ) -> Result<String, AppError> {
        if let Some(slug) = req.slug.as_deref().map(slugify).filter(|s| !s.is_empty()) {
            taken.insert((req.invitation_id, slug.clone()));
            return Ok(slug);
        }

        let mut base = slugify(&req.name);
        if base.is_empty() {
            base = "guest".to_string();
        }
        loop {
            let candidate = format!("{base}-{}", hex_suffix(self.ids.as_ref(), 6));
            let key = (req.invitation_id, candidate);
            if taken.contains(&key) || self.store.slug_exists(key.0, &key.1).await? {
                continue;
            }
            taken.insert(key.clone());
            return Ok(key.1);
        }
    }
}

fn validate(req: &NewGuest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Guest name is required"));
    }
    if req.pax_request.is_some_and(|pax| pax < 0) {
        return Err(AppError::validation("pax_request cannot be negative"));
    }
    if let Some(email) = req.email.as_deref() {
        parse_email(email)?;
    }
    Ok(())
}

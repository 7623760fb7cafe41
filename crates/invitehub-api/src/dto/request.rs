//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use invitehub_core::error::AppError;
use invitehub_core::types::{GuestId, InvitationId};
use invitehub_entity::guest::GuestKind;
use invitehub_entity::invitation::InvitationContent;
use invitehub_entity::membership::MemberRole;
use invitehub_service::{InvitationChanges, NewGuest, NewInvitation};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Identity-provider ID token.
    #[validate(length(min = 1, message = "Token required"))]
    pub token: String,
}

/// Create invitation request. Content fields sit at the top level.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    #[serde(flatten)]
    pub content: InvitationContent,
    #[validate(length(max = 255))]
    pub slug: Option<String>,
    pub theme_id: Option<String>,
    pub song_id: Option<String>,
}

impl From<CreateInvitationRequest> for NewInvitation {
    fn from(req: CreateInvitationRequest) -> Self {
        Self {
            content: req.content,
            slug: req.slug,
            theme_id: req.theme_id,
            song_id: req.song_id,
            expires_at: None,
        }
    }
}

/// Full replacement of an invitation. An empty `slug` regenerates it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateInvitationRequest {
    #[serde(flatten)]
    pub content: InvitationContent,
    #[validate(length(max = 255))]
    pub slug: Option<String>,
    pub theme_id: Option<String>,
    pub song_id: Option<String>,
}

impl From<UpdateInvitationRequest> for InvitationChanges {
    fn from(req: UpdateInvitationRequest) -> Self {
        Self {
            content: req.content,
            slug: req.slug,
            theme_id: req.theme_id,
            song_id: req.song_id,
        }
    }
}

/// Invite a collaborator by email.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// `editor` or `viewer`.
    #[serde(default = "default_invite_role")]
    pub role: String,
}

impl InviteRequest {
    /// Parse the role, rejecting anything outside the closed set.
    pub fn role(&self) -> Result<MemberRole, AppError> {
        self.role.trim().to_lowercase().parse()
    }
}

fn default_invite_role() -> String {
    MemberRole::Viewer.as_str().to_string()
}

/// Redeem an invite token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Guest listing filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestListQuery {
    pub invitation_id: InvitationId,
}

/// Create guest request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGuestRequest {
    #[serde(alias = "invitation")]
    pub invitation_id: InvitationId,
    #[validate(length(min = 1, max = 255, message = "Guest name is required"))]
    pub name: String,
    pub slug: Option<String>,
    /// `individual` (default) or `group`.
    pub kind: Option<String>,
    #[serde(default)]
    pub whatsapp: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 0))]
    pub pax_request: Option<i32>,
}

impl TryFrom<CreateGuestRequest> for NewGuest {
    type Error = AppError;

    fn try_from(req: CreateGuestRequest) -> Result<Self, Self::Error> {
        let kind = match req.kind.as_deref() {
            Some(kind) => kind.parse()?,
            None => GuestKind::default(),
        };
        Ok(Self {
            invitation_id: req.invitation_id,
            name: req.name,
            slug: req.slug,
            kind,
            whatsapp: req.whatsapp,
            email: req.email.filter(|e| !e.trim().is_empty()),
            pax_request: req.pax_request,
        })
    }
}

/// Create several guests at once.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkCreateGuestsRequest {
    #[validate(length(min = 1, message = "At least one guest is required"), nested)]
    pub guests: Vec<CreateGuestRequest>,
}

/// Delete several guests at once.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkDeleteGuestsRequest {
    #[validate(length(min = 1, message = "No guest ids given"))]
    pub ids: Vec<GuestId>,
}

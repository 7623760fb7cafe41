//! Guest entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use invitehub_core::types::{GuestId, InvitationId};

use super::kind::GuestKind;

/// A guest on an invitation's recipient list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Guest {
    pub id: GuestId,
    pub invitation_id: InvitationId,
    pub name: String,
    /// Per-guest URL component, unique within the invitation.
    pub slug: String,
    pub kind: GuestKind,
    pub whatsapp: String,
    pub email: Option<String>,
    pub is_sent: bool,
    pub viewed_at: Option<DateTime<Utc>>,
    pub is_clicked_atm: bool,
    pub rsvp: Option<bool>,
    pub pax_request: Option<i32>,
    pub pax_confirmed: Option<i32>,
    pub greetings: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a new guest.
#[derive(Debug, Clone)]
pub struct CreateGuest {
    pub id: GuestId,
    pub invitation_id: InvitationId,
    pub name: String,
    pub slug: String,
    pub kind: GuestKind,
    pub whatsapp: String,
    pub email: Option<String>,
    pub pax_request: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl CreateGuest {
    /// Materialize the row a store would hold right after insert.
    pub fn into_guest(self) -> Guest {
        Guest {
            id: self.id,
            invitation_id: self.invitation_id,
            name: self.name,
            slug: self.slug,
            kind: self.kind,
            whatsapp: self.whatsapp,
            email: self.email,
            is_sent: false,
            viewed_at: None,
            is_clicked_atm: false,
            rsvp: None,
            pax_request: self.pax_request,
            pax_confirmed: None,
            greetings: Json(Vec::new()),
            created_at: self.created_at,
        }
    }
}

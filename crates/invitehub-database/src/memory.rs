//! In-memory store using a Tokio mutex for single-node deployments and tests.
//!
//! All tables sit behind one lock, so every trait method is atomic with
//! respect to every other. Foreign keys, unique constraints and cascades
//! mirror the PostgreSQL schema.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::Mutex;

use invitehub_core::error::AppError;
use invitehub_core::result::AppResult;
use invitehub_core::types::{GuestId, InvitationId, TicketId, UserId};
use invitehub_entity::guest::{CreateGuest, Guest};
use invitehub_entity::invitation::{CreateInvitation, Invitation, UpdateInvitation};
use invitehub_entity::membership::{CreateMembership, MemberView, Membership};
use invitehub_entity::ticket::{CreateTicket, PendingInvite, Ticket};
use invitehub_entity::user::{UpsertUser, User};

use crate::store::{GuestStore, InvitationStore, MembershipStore, TicketStore, UserStore};

/// Internal tables for the in-memory store.
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    invitations: HashMap<InvitationId, Invitation>,
    memberships: Vec<Membership>,
    tickets: Vec<Ticket>,
    guests: Vec<Guest>,
}

impl Tables {
    fn require_user(&self, id: UserId) -> AppResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::not_found(format!("User {id} not found")))
        }
    }

    fn require_invitation(&self, id: InvitationId) -> AppResult<()> {
        if self.invitations.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Invitation {id} not found")))
        }
    }

    /// Delete an invitation and everything it owns.
    fn remove_invitation(&mut self, id: InvitationId) -> bool {
        if self.invitations.remove(&id).is_none() {
            return false;
        }
        self.memberships.retain(|m| m.invitation_id != id);
        self.tickets.retain(|t| t.invitation_id != id);
        self.guests.retain(|g| g.invitation_id != id);
        true
    }

    /// Unclaimed, unexpired, and attached to a live invitation.
    fn is_claimable(&self, ticket: &Ticket, now: DateTime<Utc>) -> bool {
        ticket.is_usable_at(now)
            && self
                .invitations
                .get(&ticket.invitation_id)
                .is_some_and(|i| !i.is_expired_at(now))
    }

    fn membership(&self, invitation_id: InvitationId, user_id: UserId) -> Option<&Membership> {
        self.memberships
            .iter()
            .find(|m| m.invitation_id == invitation_id && m.user_id == user_id)
    }

    fn insert_membership_if_absent(&mut self, data: &CreateMembership) -> AppResult<Membership> {
        self.require_invitation(data.invitation_id)?;
        self.require_user(data.user_id)?;

        if let Some(existing) = self.membership(data.invitation_id, data.user_id) {
            return Ok(existing.clone());
        }

        let membership = Membership {
            id: data.id,
            invitation_id: data.invitation_id,
            user_id: data.user_id,
            role: data.role,
            created_at: data.created_at,
        };
        self.memberships.push(membership.clone());
        Ok(membership)
    }
}

/// In-memory implementation of every store trait.
///
/// Cloning is cheap and clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Protected tables.
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn create_with_owner(
        &self,
        invitation: &CreateInvitation,
        owner: &CreateMembership,
    ) -> AppResult<Invitation> {
        let mut tables = self.tables.lock().await;

        tables.require_user(invitation.owner_id)?;
        if tables.invitations.values().any(|i| i.slug == invitation.slug) {
            return Err(AppError::conflict(format!(
                "Slug '{}' is already in use",
                invitation.slug
            )));
        }
        if tables.invitations.contains_key(&invitation.id) {
            return Err(AppError::conflict("Invitation already exists"));
        }

        let created = Invitation {
            id: invitation.id,
            owner_id: invitation.owner_id,
            slug: invitation.slug.clone(),
            theme_id: invitation.theme_id.clone(),
            song_id: invitation.song_id.clone(),
            content: Json(invitation.content.clone()),
            created_at: invitation.created_at,
            expires_at: invitation.expires_at,
        };
        tables.invitations.insert(created.id, created.clone());
        tables.insert_membership_if_absent(owner)?;

        Ok(created)
    }

    async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.invitations.values().any(|i| i.slug == slug))
    }

    async fn find_by_id(&self, id: InvitationId) -> AppResult<Option<Invitation>> {
        let tables = self.tables.lock().await;
        Ok(tables.invitations.get(&id).cloned())
    }

    async fn find_live_by_id(
        &self,
        id: InvitationId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .invitations
            .get(&id)
            .filter(|i| !i.is_expired_at(now))
            .cloned())
    }

    async fn list_live_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Invitation>> {
        let tables = self.tables.lock().await;
        let mut visible: Vec<Invitation> = tables
            .invitations
            .values()
            .filter(|i| !i.is_expired_at(now))
            .filter(|i| i.owner_id == user_id || tables.membership(i.id, user_id).is_some())
            .cloned()
            .collect();
        visible.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(visible)
    }

    async fn delete_expired_for_owner(
        &self,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let expired: Vec<InvitationId> = tables
            .invitations
            .values()
            .filter(|i| i.owner_id == owner_id && i.is_expired_at(now))
            .map(|i| i.id)
            .collect();

        let mut removed = 0;
        for id in expired {
            if tables.remove_invitation(id) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn update(
        &self,
        id: InvitationId,
        data: &UpdateInvitation,
    ) -> AppResult<Option<Invitation>> {
        let mut tables = self.tables.lock().await;
        if tables
            .invitations
            .values()
            .any(|i| i.id != id && i.slug == data.slug)
        {
            return Err(AppError::conflict(format!(
                "Slug '{}' is already in use",
                data.slug
            )));
        }

        Ok(tables.invitations.get_mut(&id).map(|invitation| {
            invitation.slug = data.slug.clone();
            invitation.theme_id = data.theme_id.clone();
            invitation.song_id = data.song_id.clone();
            invitation.content = Json(data.content.clone());
            invitation.clone()
        }))
    }

    async fn set_expiry(
        &self,
        id: InvitationId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.invitations.get_mut(&id).map(|invitation| {
            invitation.expires_at = expires_at;
            invitation.clone()
        }))
    }

    async fn delete(&self, id: InvitationId) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        Ok(tables.remove_invitation(id))
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn insert_if_absent(&self, data: &CreateMembership) -> AppResult<Membership> {
        let mut tables = self.tables.lock().await;
        tables.insert_membership_if_absent(data)
    }

    async fn find(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
    ) -> AppResult<Option<Membership>> {
        let tables = self.tables.lock().await;
        Ok(tables.membership(invitation_id, user_id).cloned())
    }

    async fn list_members(&self, invitation_id: InvitationId) -> AppResult<Vec<MemberView>> {
        let tables = self.tables.lock().await;
        let mut members: Vec<MemberView> = tables
            .memberships
            .iter()
            .filter(|m| m.invitation_id == invitation_id)
            .filter_map(|m| {
                tables.users.get(&m.user_id).map(|user| MemberView {
                    id: m.id,
                    user_id: m.user_id,
                    username: user.username.clone(),
                    email: user.email.clone(),
                    role: m.role,
                    joined_at: m.created_at,
                })
            })
            .collect();
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(members)
    }

    async fn delete_for_invitation(&self, invitation_id: InvitationId) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let before = tables.memberships.len();
        tables.memberships.retain(|m| m.invitation_id != invitation_id);
        Ok((before - tables.memberships.len()) as u64)
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn create(&self, data: &CreateTicket) -> AppResult<Ticket> {
        let mut tables = self.tables.lock().await;
        tables.require_invitation(data.invitation_id)?;
        tables.require_user(data.invited_by)?;
        if tables
            .tickets
            .iter()
            .any(|t| t.token_digest == data.token_digest)
        {
            return Err(AppError::conflict("Ticket digest already exists"));
        }

        let ticket = Ticket {
            id: data.id,
            invitation_id: data.invitation_id,
            email: data.email.clone(),
            role: data.role,
            token_digest: data.token_digest.clone(),
            expires_at: data.expires_at,
            is_claimed: false,
            invited_by: data.invited_by,
            created_at: data.created_at,
        };
        tables.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn find_usable_by_digest(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Ticket>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .tickets
            .iter()
            .find(|t| t.token_digest == token_digest && tables.is_claimable(t, now))
            .cloned())
    }

    async fn claim(
        &self,
        ticket_id: TicketId,
        now: DateTime<Utc>,
        membership: &CreateMembership,
    ) -> AppResult<Option<Membership>> {
        let mut tables = self.tables.lock().await;

        let Some(index) = tables
            .tickets
            .iter()
            .position(|t| t.id == ticket_id && tables.is_claimable(t, now))
        else {
            return Ok(None);
        };

        // Resolve the membership before flipping so a failure writes nothing.
        let effective = tables.insert_membership_if_absent(membership)?;
        tables.tickets[index].is_claimed = true;
        Ok(Some(effective))
    }

    async fn list_pending_for_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<PendingInvite>> {
        let tables = self.tables.lock().await;
        let mut pending: Vec<(DateTime<Utc>, PendingInvite)> = tables
            .tickets
            .iter()
            .filter(|t| t.email == email && t.is_usable_at(now))
            .filter_map(|t| {
                let invitation = tables
                    .invitations
                    .get(&t.invitation_id)
                    .filter(|i| !i.is_expired_at(now))?;
                let owner = tables.users.get(&invitation.owner_id)?;
                Some((
                    t.created_at,
                    PendingInvite {
                        ticket_id: t.id,
                        invitation_id: t.invitation_id,
                        email: t.email.clone(),
                        role: t.role,
                        expires_at: t.expires_at,
                        invitation_slug: invitation.slug.clone(),
                        groom_name: invitation.content.groom_name.clone(),
                        bride_name: invitation.content.bride_name.clone(),
                        owner_username: owner.username.clone(),
                    },
                ))
            })
            .collect();
        pending.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(pending.into_iter().map(|(_, invite)| invite).collect())
    }

    async fn list_for_invitation(&self, invitation_id: InvitationId) -> AppResult<Vec<Ticket>> {
        let tables = self.tables.lock().await;
        let mut tickets: Vec<Ticket> = tables
            .tickets
            .iter()
            .filter(|t| t.invitation_id == invitation_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }
}

#[async_trait]
impl GuestStore for MemoryStore {
    async fn list_for_invitation(&self, invitation_id: InvitationId) -> AppResult<Vec<Guest>> {
        let tables = self.tables.lock().await;
        let mut guests: Vec<Guest> = tables
            .guests
            .iter()
            .filter(|g| g.invitation_id == invitation_id)
            .cloned()
            .collect();
        guests.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(guests)
    }

    async fn find_by_ids(&self, ids: &[GuestId]) -> AppResult<Vec<Guest>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .guests
            .iter()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn slug_exists(&self, invitation_id: InvitationId, slug: &str) -> AppResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .guests
            .iter()
            .any(|g| g.invitation_id == invitation_id && g.slug == slug))
    }

    async fn create_many(&self, guests: &[CreateGuest]) -> AppResult<Vec<Guest>> {
        let mut tables = self.tables.lock().await;

        // Validate the whole batch before writing any row.
        for (index, guest) in guests.iter().enumerate() {
            tables.require_invitation(guest.invitation_id)?;
            let clashes_existing = tables
                .guests
                .iter()
                .any(|g| g.invitation_id == guest.invitation_id && g.slug == guest.slug);
            let clashes_batch = guests[..index]
                .iter()
                .any(|g| g.invitation_id == guest.invitation_id && g.slug == guest.slug);
            if clashes_existing || clashes_batch {
                return Err(AppError::conflict(format!(
                    "Guest slug '{}' is already in use",
                    guest.slug
                )));
            }
        }

        let created: Vec<Guest> = guests.iter().cloned().map(CreateGuest::into_guest).collect();
        tables.guests.extend(created.iter().cloned());
        Ok(created)
    }

    async fn delete_many(&self, ids: &[GuestId]) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let before = tables.guests.len();
        tables.guests.retain(|g| !ids.contains(&g.id));
        Ok((before - tables.guests.len()) as u64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().any(|u| u.username == username))
    }

    async fn upsert_by_email(&self, data: &UpsertUser) -> AppResult<User> {
        let mut tables = self.tables.lock().await;

        if let Some(user) = tables.users.values_mut().find(|u| u.email == data.email) {
            user.first_name = data.first_name.clone();
            user.last_name = data.last_name.clone();
            user.picture_url = data.picture_url.clone();
            user.updated_at = data.now;
            return Ok(user.clone());
        }

        if tables.users.values().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                data.username
            )));
        }

        let user = User {
            id: data.id,
            email: data.email.clone(),
            username: data.username.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            picture_url: data.picture_url.clone(),
            created_at: data.now,
            updated_at: data.now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

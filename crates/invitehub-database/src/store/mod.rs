//! Store traits consumed by the service layer.
//!
//! Every method that touches more than one row or table is atomic: the
//! PostgreSQL repositories run it in one transaction and the
//! [`MemoryStore`](crate::MemoryStore) runs it under one lock.

pub mod guest;
pub mod invitation;
pub mod membership;
pub mod ticket;
pub mod user;

use std::sync::Arc;

use sqlx::PgPool;

pub use guest::GuestStore;
pub use invitation::InvitationStore;
pub use membership::MembershipStore;
pub use ticket::TicketStore;
pub use user::UserStore;

use crate::memory::MemoryStore;
use crate::repositories::{
    GuestRepository, InvitationRepository, MembershipRepository, TicketRepository, UserRepository,
};

/// The full set of stores, as handed to the service layer.
#[derive(Clone)]
pub struct Stores {
    pub invitations: Arc<dyn InvitationStore>,
    pub memberships: Arc<dyn MembershipStore>,
    pub tickets: Arc<dyn TicketStore>,
    pub guests: Arc<dyn GuestStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            invitations: Arc::new(InvitationRepository::new(pool.clone())),
            memberships: Arc::new(MembershipRepository::new(pool.clone())),
            tickets: Arc::new(TicketRepository::new(pool.clone())),
            guests: Arc::new(GuestRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
        }
    }

    /// In-memory stores sharing one set of tables.
    pub fn memory(store: MemoryStore) -> Self {
        Self {
            invitations: Arc::new(store.clone()),
            memberships: Arc::new(store.clone()),
            tickets: Arc::new(store.clone()),
            guests: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

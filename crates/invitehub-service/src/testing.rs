//! Shared fixtures for service tests: every service wired over one
//! in-memory store with a manual clock.

use std::sync::Arc;

use chrono::{Duration, Utc};

use invitehub_auth::{
    AccessEvaluator, JwtEncoder, MembershipRegistry, StaticIdentityVerifier, TokenCodec,
    VerifiedIdentity,
};
use invitehub_core::config::AuthConfig;
use invitehub_core::traits::{Clock, IdGenerator, ManualClock, SeededIdGenerator};
use invitehub_core::types::UserId;
use invitehub_database::MemoryStore;
use invitehub_database::store::UserStore;
use invitehub_entity::invitation::InvitationContent;
use invitehub_entity::user::{UpsertUser, User};

use crate::collaboration::CollaborationService;
use crate::context::RequestContext;
use crate::guest::GuestService;
use crate::lifecycle::InvitationLifecycle;
use crate::ticket::TicketRegistry;
use crate::user::UserService;

pub(crate) struct Harness {
    pub store: MemoryStore,
    pub clock: Arc<ManualClock>,
    pub ids: Arc<SeededIdGenerator>,
    pub registry: Arc<MembershipRegistry>,
    pub lifecycle: Arc<InvitationLifecycle>,
    pub tickets: TicketRegistry,
    pub collaboration: CollaborationService,
    pub guests: GuestService,
    pub users: UserService,
}

impl Harness {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        // Tokens signed here are checked against the wall clock.
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let ids = Arc::new(SeededIdGenerator::new(42));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let dyn_ids: Arc<dyn IdGenerator> = ids.clone();

        let registry = Arc::new(MembershipRegistry::new(
            Arc::new(store.clone()),
            dyn_clock.clone(),
            dyn_ids.clone(),
        ));
        let evaluator = Arc::new(AccessEvaluator::new(registry.clone()));
        let lifecycle = Arc::new(InvitationLifecycle::new(
            Arc::new(store.clone()),
            registry.clone(),
            dyn_clock.clone(),
            dyn_ids.clone(),
            Duration::days(3),
        ));
        let codec = TokenCodec::new(dyn_ids.clone(), 16).expect("token codec");
        let tickets = TicketRegistry::new(
            Arc::new(store.clone()),
            registry.clone(),
            codec,
            dyn_clock.clone(),
            dyn_ids.clone(),
        );
        let collaboration = CollaborationService::new(
            lifecycle.clone(),
            Arc::new(tickets.clone()),
            registry.clone(),
            evaluator.clone(),
            Duration::hours(24),
        );
        let guests = GuestService::new(
            Arc::new(store.clone()),
            lifecycle.clone(),
            evaluator,
            dyn_clock.clone(),
            dyn_ids.clone(),
        );

        let verifier = StaticIdentityVerifier::new()
            .with_identity("token-budi", identity("Budi@Example.com", "Budi"))
            .with_identity("token-budi-renamed", identity("budi@example.com", "Budiman"));
        let users = UserService::new(
            Arc::new(store.clone()),
            Arc::new(verifier),
            Arc::new(JwtEncoder::new(&AuthConfig::default())),
            dyn_clock,
            dyn_ids,
        );

        Self {
            store,
            clock,
            ids,
            registry,
            lifecycle,
            tickets,
            collaboration,
            guests,
            users,
        }
    }

    /// Seed a user with email `{name}@x.com` and username `name`.
    pub async fn user(&self, name: &str) -> User {
        self.store
            .upsert_by_email(&UpsertUser {
                id: UserId::from_uuid(self.ids.new_uuid()),
                email: format!("{name}@x.com"),
                username: name.to_string(),
                first_name: name.to_string(),
                last_name: String::new(),
                picture_url: None,
                now: self.clock.now(),
            })
            .await
            .expect("seed user")
    }

    pub async fn ctx(&self, name: &str) -> RequestContext {
        let user = self.user(name).await;
        RequestContext::new(user.id, user.email, user.username, self.clock.now())
    }
}

fn identity(email: &str, first_name: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: "Santoso".to_string(),
        picture_url: None,
    }
}

/// Complete content for the couple Adam and Hawa.
pub(crate) fn content() -> InvitationContent {
    InvitationContent {
        groom_name: "Adam".into(),
        bride_name: "Hawa".into(),
        groom_father: "Ayah Adam".into(),
        groom_mother: "Ibu Adam".into(),
        bride_father: "Ayah Hawa".into(),
        bride_mother: "Ibu Hawa".into(),
        ..Default::default()
    }
}

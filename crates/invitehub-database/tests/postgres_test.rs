//! PostgreSQL repository tests.
//!
//! These run against the database named by `DATABASE_URL` and return early
//! when it is unset. Every test seeds its own users and invitations under
//! fresh identifiers, so they can share one database and run in parallel.

use chrono::{DateTime, Duration, DurationRound, Utc};
use futures::future::join_all;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use invitehub_core::types::{GuestId, InvitationId, MembershipId, TicketId, UserId};
use invitehub_database::migration::run_migrations;
use invitehub_database::repositories::{
    GuestRepository, InvitationRepository, MembershipRepository, TicketRepository, UserRepository,
};
use invitehub_database::store::{
    GuestStore, InvitationStore, MembershipStore, TicketStore, UserStore,
};
use invitehub_entity::guest::{CreateGuest, GuestKind};
use invitehub_entity::invitation::{CreateInvitation, Invitation, InvitationContent};
use invitehub_entity::membership::{CreateMembership, MemberRole};
use invitehub_entity::ticket::CreateTicket;
use invitehub_entity::user::{UpsertUser, User};

async fn pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

/// Current time at PostgreSQL's microsecond precision.
fn now() -> DateTime<Utc> {
    Utc::now()
        .duration_trunc(Duration::microseconds(1))
        .expect("truncate timestamp")
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn user(pool: &PgPool) -> User {
    let name = unique("user");
    UserRepository::new(pool.clone())
        .upsert_by_email(&UpsertUser {
            id: UserId::from_uuid(Uuid::new_v4()),
            email: format!("{name}@example.test"),
            username: name,
            first_name: "Test".into(),
            last_name: "User".into(),
            picture_url: None,
            now: now(),
        })
        .await
        .expect("create user")
}

async fn invitation(pool: &PgPool, owner: UserId, expires_at: DateTime<Utc>) -> Invitation {
    let id = InvitationId::from_uuid(Uuid::new_v4());
    InvitationRepository::new(pool.clone())
        .create_with_owner(
            &CreateInvitation {
                id,
                owner_id: owner,
                slug: unique("adam-hawa"),
                theme_id: None,
                song_id: None,
                content: InvitationContent {
                    groom_name: "Adam".into(),
                    bride_name: "Hawa".into(),
                    ..Default::default()
                },
                created_at: now(),
                expires_at,
            },
            &membership(id, owner, MemberRole::Owner),
        )
        .await
        .expect("create invitation")
}

async fn ticket(pool: &PgPool, invitation: &Invitation, email: &str) -> TicketId {
    let id = TicketId::from_uuid(Uuid::new_v4());
    TicketRepository::new(pool.clone())
        .create(&CreateTicket {
            id,
            invitation_id: invitation.id,
            email: email.into(),
            role: MemberRole::Editor,
            token_digest: unique("digest"),
            expires_at: now() + Duration::hours(24),
            invited_by: invitation.owner_id,
            created_at: now(),
        })
        .await
        .expect("create ticket");
    id
}

fn membership(invitation_id: InvitationId, user_id: UserId, role: MemberRole) -> CreateMembership {
    CreateMembership {
        id: MembershipId::from_uuid(Uuid::new_v4()),
        invitation_id,
        user_id,
        role,
        created_at: now(),
    }
}

async fn count(pool: &PgPool, table: &str, invitation_id: InvitationId) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {table} WHERE invitation_id = $1"
    ))
    .bind(invitation_id)
    .fetch_one(pool)
    .await
    .expect("count rows")
}

#[tokio::test]
async fn test_ticket_claims_only_once() {
    let Some(pool) = pool().await else { return };
    let tickets = TicketRepository::new(pool.clone());
    let owner = user(&pool).await;
    let bob = user(&pool).await;
    let inv = invitation(&pool, owner.id, now() + Duration::days(3)).await;
    let ticket_id = ticket(&pool, &inv, &bob.email).await;

    let first = tickets
        .claim(ticket_id, now(), &membership(inv.id, bob.id, MemberRole::Editor))
        .await
        .unwrap();
    assert_eq!(first.map(|m| m.role), Some(MemberRole::Editor));

    let second = tickets
        .claim(ticket_id, now(), &membership(inv.id, bob.id, MemberRole::Editor))
        .await
        .unwrap();
    assert!(second.is_none());
    assert_eq!(count(&pool, "invitation_members", inv.id).await, 2);
}

#[tokio::test]
async fn test_claim_refuses_ticket_of_expired_invitation() {
    let Some(pool) = pool().await else { return };
    let tickets = TicketRepository::new(pool.clone());
    let owner = user(&pool).await;
    let bob = user(&pool).await;
    let inv = invitation(&pool, owner.id, now() - Duration::hours(1)).await;
    let ticket_id = ticket(&pool, &inv, &bob.email).await;

    let claimed = tickets
        .claim(ticket_id, now(), &membership(inv.id, bob.id, MemberRole::Editor))
        .await
        .unwrap();
    assert!(claimed.is_none());
    assert_eq!(count(&pool, "invitation_members", inv.id).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_have_one_winner() {
    let Some(pool) = pool().await else { return };
    let owner = user(&pool).await;
    let inv = invitation(&pool, owner.id, now() + Duration::days(3)).await;
    let ticket_id = ticket(&pool, &inv, "leaked@example.test").await;

    let mut claimants = Vec::new();
    for _ in 0..8 {
        claimants.push(user(&pool).await);
    }

    let handles = claimants.iter().map(|claimant| {
        let tickets = TicketRepository::new(pool.clone());
        let data = membership(inv.id, claimant.id, MemberRole::Editor);
        tokio::spawn(async move { tickets.claim(ticket_id, now(), &data).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_some()).count(), 1);
    assert_eq!(count(&pool, "invitation_members", inv.id).await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_insert_if_absent_keeps_one_row() {
    let Some(pool) = pool().await else { return };
    let owner = user(&pool).await;
    let bob = user(&pool).await;
    let inv = invitation(&pool, owner.id, now() + Duration::days(3)).await;

    let handles = (0..8).map(|i| {
        let members = MembershipRepository::new(pool.clone());
        let role = if i % 2 == 0 { MemberRole::Editor } else { MemberRole::Viewer };
        let data = membership(inv.id, bob.id, role);
        tokio::spawn(async move { members.insert_if_absent(&data).await })
    });
    let rows: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let first = &rows[0];
    assert!(rows.iter().all(|m| m.id == first.id && m.role == first.role));
    assert_eq!(count(&pool, "invitation_members", inv.id).await, 2);
}

#[tokio::test]
async fn test_insert_if_absent_keeps_existing_role() {
    let Some(pool) = pool().await else { return };
    let members = MembershipRepository::new(pool.clone());
    let owner = user(&pool).await;
    let inv = invitation(&pool, owner.id, now() + Duration::days(3)).await;

    let kept = members
        .insert_if_absent(&membership(inv.id, owner.id, MemberRole::Viewer))
        .await
        .unwrap();
    assert_eq!(kept.role, MemberRole::Owner);
}

#[tokio::test]
async fn test_purge_cascades_to_dependents() {
    let Some(pool) = pool().await else { return };
    let invitations = InvitationRepository::new(pool.clone());
    let owner = user(&pool).await;
    let bob = user(&pool).await;
    let expired = invitation(&pool, owner.id, now() - Duration::days(1)).await;
    let live = invitation(&pool, owner.id, now() + Duration::days(1)).await;

    ticket(&pool, &expired, "carol@example.test").await;
    MembershipRepository::new(pool.clone())
        .insert_if_absent(&membership(expired.id, bob.id, MemberRole::Viewer))
        .await
        .unwrap();
    GuestRepository::new(pool.clone())
        .create_many(&[CreateGuest {
            id: GuestId::from_uuid(Uuid::new_v4()),
            invitation_id: expired.id,
            name: "Budi".into(),
            slug: "budi".into(),
            kind: GuestKind::Individual,
            whatsapp: "08123".into(),
            email: None,
            pax_request: Some(2),
            created_at: now(),
        }])
        .await
        .unwrap();

    let purged = invitations
        .delete_expired_for_owner(owner.id, now())
        .await
        .unwrap();
    assert_eq!(purged, 1);

    assert!(invitations.find_by_id(expired.id).await.unwrap().is_none());
    assert!(invitations.find_by_id(live.id).await.unwrap().is_some());
    for table in ["invitation_members", "invitation_tickets", "guests"] {
        assert_eq!(count(&pool, table, expired.id).await, 0, "{table} left behind");
    }
    assert_eq!(count(&pool, "invitation_members", live.id).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_claim_racing_purge_never_errors() {
    let Some(pool) = pool().await else { return };
    let owner = user(&pool).await;
    let bob = user(&pool).await;

    for _ in 0..20 {
        // Live for the claim, expired for the purge one second later.
        let boundary = now();
        let inv = invitation(&pool, owner.id, boundary).await;
        let ticket_id = ticket(&pool, &inv, &bob.email).await;

        let tickets = TicketRepository::new(pool.clone());
        let data = membership(inv.id, bob.id, MemberRole::Editor);
        let claim = tokio::spawn(async move { tickets.claim(ticket_id, boundary, &data).await });

        let invitations = InvitationRepository::new(pool.clone());
        let owner_id = owner.id;
        let purge = tokio::spawn(async move {
            invitations
                .delete_expired_for_owner(owner_id, boundary + Duration::seconds(1))
                .await
        });

        let (claimed, purged) = tokio::join!(claim, purge);
        claimed.unwrap().expect("claim must not fail");
        purged.unwrap().expect("purge must not fail");

        // Whichever ran first, the purge leaves nothing behind.
        let remaining = InvitationRepository::new(pool.clone())
            .delete_expired_for_owner(owner.id, boundary + Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert_eq!(count(&pool, "invitation_members", inv.id).await, 0);
        assert_eq!(count(&pool, "invitation_tickets", inv.id).await, 0);
    }
}

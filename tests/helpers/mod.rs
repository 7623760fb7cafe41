//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use invitehub_api::{AppState, build_app};
use invitehub_auth::{StaticIdentityVerifier, VerifiedIdentity};
use invitehub_core::config::{AppConfig, DatabaseConfig};
use invitehub_core::traits::{ManualClock, OsIdGenerator};
use invitehub_database::{MemoryStore, Stores};

/// Users the test identity provider knows about. Each logs in with
/// the token `google-{name}` as `{name}@x.com`.
const KNOWN_USERS: &[&str] = &["alice", "bob", "carol", "eve"];

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for driving services directly
    pub state: AppState,
    /// The in-memory tables behind every store
    pub store: MemoryStore,
    /// Clock shared by every service
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store.
    pub async fn new() -> Self {
        let config = test_config();
        let store = MemoryStore::new();
        // Access tokens are validated against the wall clock.
        let clock = Arc::new(ManualClock::new(Utc::now()));

        let verifier = KNOWN_USERS.iter().fold(StaticIdentityVerifier::new(), |v, name| {
            v.with_identity(
                format!("google-{name}"),
                VerifiedIdentity {
                    email: format!("{name}@x.com"),
                    first_name: name.to_string(),
                    last_name: "Test".to_string(),
                    picture_url: None,
                },
            )
        });

        let state = AppState::build(
            config,
            Stores::memory(store.clone()),
            clock.clone(),
            Arc::new(OsIdGenerator),
            Arc::new(verifier),
        )
        .expect("Failed to build app state");

        let router = build_app(state.clone());

        Self {
            router,
            state,
            store,
            clock,
        }
    }

    /// Login and return JWT access token
    pub async fn login(&self, name: &str) -> String {
        let body = serde_json::json!({ "token": format!("google-{name}") });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Create an invitation for the couple Adam and Hawa and return its id.
    pub async fn create_invitation(&self, token: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/invitations",
                Some(invitation_body("Adam", "Hawa")),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create failed: {:?}",
            response.body
        );
        response.body["data"]["id"]
            .as_str()
            .expect("No id in create response")
            .to_string()
    }

    /// Issue an invite ticket and return the raw token.
    pub async fn invite(&self, token: &str, invitation_id: &str, email: &str, role: &str) -> String {
        let response = self
            .request(
                "POST",
                &format!("/api/invitations/{invitation_id}/invite"),
                Some(serde_json::json!({ "email": email, "role": role })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Invite failed: {:?}",
            response.body
        );
        response.body["data"]["token"]
            .as_str()
            .expect("No token in invite response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// A complete create-invitation body.
pub fn invitation_body(groom: &str, bride: &str) -> Value {
    serde_json::json!({
        "groom_name": groom,
        "bride_name": bride,
        "groom_father": format!("Ayah {groom}"),
        "groom_mother": format!("Ibu {groom}"),
        "bride_father": format!("Ayah {bride}"),
        "bride_mother": format!("Ibu {bride}"),
        "events": [{
            "event_name": "Akad",
            "address": "Masjid Raya",
            "gmaps_link": "https://maps.example/akad",
            "date": "2027-02-14",
            "time": "08:00",
            "time_end": "10:00"
        }]
    })
}

fn test_config() -> AppConfig {
    AppConfig {
        server: Default::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
            run_migrations: false,
        },
        auth: Default::default(),
        collaboration: Default::default(),
        logging: Default::default(),
    }
}

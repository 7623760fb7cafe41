//! Route definitions for the InviteHub HTTP API.
//!
//! All routes are mounted under `/api`. Static invitation paths
//! (`join`, `my-pending`) are registered next to `{id}`; axum prefers
//! static segments over captures.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and the request logger.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(invitation_routes())
        .merge(guest_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Auth endpoints: login, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// Invitation CRUD, tickets, memberships
fn invitation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/invitations",
            get(handlers::invitation::list_invitations)
                .post(handlers::invitation::create_invitation),
        )
        .route("/invitations/join", post(handlers::invitation::join))
        .route(
            "/invitations/my-pending",
            get(handlers::invitation::my_pending),
        )
        .route(
            "/invitations/{id}",
            get(handlers::invitation::get_invitation)
                .put(handlers::invitation::update_invitation)
                .delete(handlers::invitation::delete_invitation),
        )
        .route(
            "/invitations/{id}/invite",
            post(handlers::invitation::invite),
        )
        .route(
            "/invitations/{id}/members",
            get(handlers::invitation::list_members),
        )
        .route(
            "/invitations/{id}/tickets",
            get(handlers::invitation::list_tickets),
        )
}

/// Guest list management
fn guest_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/guests",
            get(handlers::guest::list_guests).post(handlers::guest::create_guest),
        )
        .route("/guests/bulk", post(handlers::guest::bulk_create_guests))
        .route(
            "/guests/bulk-delete",
            post(handlers::guest::bulk_delete_guests),
        )
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

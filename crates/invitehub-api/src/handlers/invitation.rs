//! Invitation, invite ticket, and membership handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use invitehub_core::types::InvitationId;

use crate::dto::request::{
    CreateInvitationRequest, InviteRequest, JoinRequest, UpdateInvitationRequest,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let invitation = state
        .collaboration
        .create_invitation(&auth, req.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": invitation })),
    ))
}

/// GET /api/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let invitations = state.collaboration.list_invitations(&auth).await?;
    Ok(Json(json!({ "success": true, "data": invitations })))
}

/// GET /api/invitations/{id}
pub async fn get_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvitationId>,
) -> Result<Json<Value>, ApiError> {
    let detail = state.collaboration.get_invitation(&auth, id).await?;
    Ok(Json(json!({ "success": true, "data": detail })))
}

/// PUT /api/invitations/{id}
pub async fn update_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvitationId>,
    ValidatedJson(req): ValidatedJson<UpdateInvitationRequest>,
) -> Result<Json<Value>, ApiError> {
    let invitation = state
        .collaboration
        .update_invitation(&auth, id, req.into())
        .await?;
    Ok(Json(json!({ "success": true, "data": invitation })))
}

/// DELETE /api/invitations/{id}
pub async fn delete_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvitationId>,
) -> Result<StatusCode, ApiError> {
    state.collaboration.delete_invitation(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/invitations/{id}/invite
///
/// The response carries the raw token. It is never returned again.
pub async fn invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvitationId>,
    ValidatedJson(req): ValidatedJson<InviteRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let role = req.role()?;
    let issued = state
        .collaboration
        .issue_ticket(&auth, id, &req.email, role)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": issued })),
    ))
}

/// POST /api/invitations/join
pub async fn join(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<JoinRequest>,
) -> Result<Json<Value>, ApiError> {
    let joined = state.collaboration.join_by_token(&auth, &req.token).await?;
    Ok(Json(json!({ "success": true, "data": joined })))
}

/// GET /api/invitations/my-pending
pub async fn my_pending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let pending = state.collaboration.list_pending_invites(&auth).await?;
    Ok(Json(json!({ "success": true, "data": pending })))
}

/// GET /api/invitations/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvitationId>,
) -> Result<Json<Value>, ApiError> {
    let members = state.collaboration.list_members(&auth, id).await?;
    Ok(Json(json!({ "success": true, "data": members })))
}

/// GET /api/invitations/{id}/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<InvitationId>,
) -> Result<Json<Value>, ApiError> {
    let tickets = state.collaboration.list_tickets(&auth, id).await?;
    Ok(Json(json!({ "success": true, "data": tickets })))
}

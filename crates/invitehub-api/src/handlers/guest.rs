//! Guest list handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use invitehub_service::NewGuest;

use crate::dto::request::{
    BulkCreateGuestsRequest, BulkDeleteGuestsRequest, CreateGuestRequest, GuestListQuery,
};
use crate::dto::response::DeletedResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/guests?invitation_id=...
pub async fn list_guests(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<GuestListQuery>,
) -> Result<Json<Value>, ApiError> {
    let guests = state.guest_service.list(&auth, query.invitation_id).await?;
    Ok(Json(json!({ "success": true, "data": guests })))
}

/// POST /api/guests
pub async fn create_guest(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateGuestRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let guest = state.guest_service.create(&auth, req.try_into()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": guest })),
    ))
}

/// POST /api/guests/bulk
pub async fn bulk_create_guests(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<BulkCreateGuestsRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let guests = req
        .guests
        .into_iter()
        .map(NewGuest::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let created = state.guest_service.bulk_create(&auth, guests).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": created })),
    ))
}

/// POST /api/guests/bulk-delete
pub async fn bulk_delete_guests(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<BulkDeleteGuestsRequest>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state.guest_service.bulk_delete(&auth, req.ids).await?;
    Ok(Json(json!({ "success": true, "data": DeletedResponse { deleted } })))
}

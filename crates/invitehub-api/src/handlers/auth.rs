//! Auth handlers: login and me.

use axum::Json;
use axum::extract::State;

use invitehub_entity::user::User;
use invitehub_service::LoginResponse;

use crate::dto::request::LoginRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let response = state.user_service.login(&req.token).await?;
    Ok(Json(ApiResponse::ok(response)))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}

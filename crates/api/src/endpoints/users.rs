//! User endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use litblogs_common::AppResult;
use litblogs_core::UserProfile;
use litblogs_db::entities::user;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Role change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role: user::UserRole,
}

/// Get the calling user's own profile.
async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state.user_service.get_profile(&user.id).await?;
    Ok(ApiResponse::ok(profile))
}

/// Get a user's profile.
async fn profile(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state.user_service.get_profile(&user_id).await?;
    Ok(ApiResponse::ok(profile))
}

/// Change a user's role. Site admins only.
async fn update_role(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state
        .user_service
        .update_role(&user, &user_id, req.role)
        .await?;
    Ok(ApiResponse::ok(profile))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/{user_id}", get(profile))
        .route("/{user_id}/role", put(update_role))
}

//! Like toggle endpoints.

use axum::{
    extract::{Path, State},
    routing::post,
    Router,
};
use litblogs_common::AppResult;
use litblogs_core::{LikeTarget, ToggleResult};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Toggle a like on a post.
async fn toggle_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<ApiResponse<ToggleResult>> {
    let result = state
        .like_service
        .toggle(LikeTarget::Post, &post_id, &user)
        .await?;
    Ok(ApiResponse::ok(result))
}

/// Toggle a like on a comment.
async fn toggle_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<ToggleResult>> {
    let result = state
        .like_service
        .toggle(LikeTarget::Comment, &comment_id, &user)
        .await?;
    Ok(ApiResponse::ok(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts/{post_id}/like", post(toggle_post))
        .route("/comments/{comment_id}/like", post(toggle_comment))
}

//! Post endpoints, nested under a class.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use litblogs_common::AppResult;
use litblogs_core::{CreatePostInput, PostView, UpdatePostInput};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create a post in a class.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostView>> {
    let view = state.post_service.create(&class_id, &user, input).await?;
    Ok(ApiResponse::ok(view))
}

/// List the posts of a class, newest first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> AppResult<ApiResponse<Vec<PostView>>> {
    let views = state.post_service.list(&class_id, &user).await?;
    Ok(ApiResponse::ok(views))
}

/// Get one post.
async fn details(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((class_id, post_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PostView>> {
    let view = state.post_service.get(&class_id, &post_id, &user).await?;
    Ok(ApiResponse::ok(view))
}

/// Update a post.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((class_id, post_id)): Path<(String, String)>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<PostView>> {
    let view = state
        .post_service
        .update(&class_id, &post_id, &user, input)
        .await?;
    Ok(ApiResponse::ok(view))
}

/// Delete a post.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((class_id, post_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    state.post_service.delete(&class_id, &post_id, &user).await?;
    Ok(crate::response::no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{post_id}", get(details).put(update).delete(delete))
}

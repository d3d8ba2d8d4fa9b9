//! Comment endpoints: the threaded tree on a post and reply expansion.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete as delete_route, get},
    Json, Router,
};
use litblogs_common::AppResult;
use litblogs_core::{
    CommentNode, CommentTreePage, CreateCommentInput, ReplyPage, DEFAULT_MAX_DEPTH,
};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Pagination for the root comment page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentTreeQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_tree_limit")]
    pub limit: u64,
    #[serde(default = "default_max_depth")]
    pub max_depth: u64,
}

/// Pagination for a reply page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepliesQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_replies_limit")]
    pub limit: u64,
}

const fn default_tree_limit() -> u64 {
    20
}

const fn default_replies_limit() -> u64 {
    10
}

const fn default_max_depth() -> u64 {
    DEFAULT_MAX_DEPTH
}

/// Get the comment tree of a post.
async fn tree(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<CommentTreeQuery>,
) -> AppResult<ApiResponse<CommentTreePage>> {
    let limit = query.limit.min(100);
    let page = state
        .comment_service
        .get_comment_tree(&post_id, &user, query.skip, limit, query.max_depth)
        .await?;
    Ok(ApiResponse::ok(page))
}

/// Comment on a post, optionally as a reply.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentNode>> {
    let node = state
        .comment_service
        .create_comment(&post_id, &user, input)
        .await?;
    Ok(ApiResponse::ok(node))
}

/// Get one page of direct replies under a comment.
async fn replies(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Query(query): Query<RepliesQuery>,
) -> AppResult<ApiResponse<ReplyPage>> {
    let limit = query.limit.min(100);
    let page = state
        .comment_service
        .get_replies(&comment_id, &user, query.skip, limit)
        .await?;
    Ok(ApiResponse::ok(page))
}

/// Delete a comment and its reply subtree.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state
        .comment_service
        .delete_comment(&comment_id, &user)
        .await?;
    Ok(crate::response::no_content())
}

/// Routes nested under `/posts/{post_id}/comments`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(tree).post(create))
}

/// Routes addressing a comment directly under `/comments`.
pub fn comment_router() -> Router<AppState> {
    Router::new()
        .route("/{comment_id}/replies", get(replies))
        .route("/{comment_id}", delete_route(delete))
}

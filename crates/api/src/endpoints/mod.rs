//! API endpoints.

mod classes;
mod comments;
mod likes;
mod posts;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/classes", classes::router())
        .nest("/classes/{class_id}/posts", posts::router())
        .nest("/posts/{post_id}/comments", comments::router())
        .nest("/comments", comments::comment_router())
        .merge(likes::router())
        .nest("/users", users::router())
}

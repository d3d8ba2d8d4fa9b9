//! API middleware and application state.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use litblogs_core::{ClassService, CommentService, LikeService, PostService, UserService};

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub class_service: ClassService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub like_service: LikeService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to an account and stashes it in the
/// request extensions; routes decide via [`crate::extractors::AuthUser`]
/// whether a missing account is fatal.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token did not resolve to an account");
            }
        }
    }

    next.run(req).await
}

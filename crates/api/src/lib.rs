//! HTTP API layer for litblogs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: classes, posts, comment trees, likes, users
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token resolution, application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{auth_middleware, AppState};

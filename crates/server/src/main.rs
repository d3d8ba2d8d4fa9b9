//! Litblogs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use litblogs_api::{router as api_router, AppState};
use litblogs_common::Config;
use litblogs_core::{
    AccessService, ClassService, CommentService, LikeService, PostService, UserService,
};
use litblogs_db::repositories::{
    ClassRepository, CommentLikeRepository, CommentRepository, EnrollmentRepository,
    PostLikeRepository, PostRepository, TeacherRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "litblogs=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting litblogs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = litblogs_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    litblogs_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let teacher_repo = TeacherRepository::new(Arc::clone(&db));
    let class_repo = ClassRepository::new(Arc::clone(&db));
    let enrollment_repo = EnrollmentRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let post_like_repo = PostLikeRepository::new(Arc::clone(&db));
    let comment_like_repo = CommentLikeRepository::new(Arc::clone(&db));

    // Initialize services
    let access_service = AccessService::new(teacher_repo.clone(), enrollment_repo.clone());
    let user_service = UserService::new(user_repo.clone());
    let class_service = ClassService::new(
        class_repo.clone(),
        teacher_repo.clone(),
        enrollment_repo.clone(),
        post_repo.clone(),
        user_repo.clone(),
        access_service.clone(),
    );
    let post_service = PostService::new(
        post_repo.clone(),
        class_repo.clone(),
        user_repo.clone(),
        comment_repo.clone(),
        post_like_repo.clone(),
        access_service.clone(),
    );
    let comment_service = CommentService::new(
        comment_repo.clone(),
        post_repo.clone(),
        class_repo.clone(),
        user_repo,
        comment_like_repo.clone(),
        access_service.clone(),
    );
    let like_service = LikeService::new(
        post_repo,
        comment_repo,
        class_repo,
        post_like_repo,
        comment_like_repo,
        access_service,
    );

    let state = AppState {
        user_service,
        class_service,
        post_service,
        comment_service,
        like_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            litblogs_api::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

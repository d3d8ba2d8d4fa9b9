//! API integration tests.
//!
//! These tests drive the router end to end with mock databases: the
//! auth middleware resolves a bearer token, handlers run, and the
//! response status reflects the service outcome.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use chrono::Utc;
use litblogs_api::{auth_middleware, router as api_router, AppState};
use litblogs_core::{
    AccessService, ClassService, CommentService, LikeService, PostService, UserService,
};
use litblogs_db::entities::{class, enrollment, post, user};
use litblogs_db::repositories::{
    ClassRepository, CommentLikeRepository, CommentRepository, EnrollmentRepository,
    PostLikeRepository, PostRepository, TeacherRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, MockDatabase};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

fn test_user(id: &str, role: user::UserRole, token: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: format!("user-{id}"),
        email: format!("{id}@example.com"),
        first_name: None,
        last_name: None,
        role,
        is_admin: false,
        bio: None,
        profile_image: None,
        token: Some(token.to_string()),
        created_at: Utc::now().into(),
    }
}

fn test_post(id: &str, class_id: &str) -> post::Model {
    post::Model {
        id: id.to_string(),
        title: "Essay".to_string(),
        content: "<p>text</p>".to_string(),
        user_id: "author".to_string(),
        class_id: class_id.to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_class(id: &str) -> class::Model {
    class::Model {
        id: id.to_string(),
        name: "Literature 101".to_string(),
        description: None,
        access_code: "AB23CD".to_string(),
        status: class::ClassStatus::Active,
        teacher_id: "t1".to_string(),
        created_at: Utc::now().into(),
    }
}

fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// Build the app with the given mock databases; every repository not
/// named here gets an empty mock.
fn test_app(
    user_db: MockDatabase,
    class_db: MockDatabase,
    post_db: MockDatabase,
    comment_db: MockDatabase,
    enrollment_db: MockDatabase,
) -> Router {
    let empty = || Arc::new(mock().into_connection());

    let user_repo = UserRepository::new(Arc::new(user_db.into_connection()));
    let class_repo = ClassRepository::new(Arc::new(class_db.into_connection()));
    let teacher_repo = TeacherRepository::new(empty());
    let enrollment_repo = EnrollmentRepository::new(Arc::new(enrollment_db.into_connection()));
    let post_repo = PostRepository::new(Arc::new(post_db.into_connection()));
    let comment_repo = CommentRepository::new(Arc::new(comment_db.into_connection()));
    let post_like_repo = PostLikeRepository::new(empty());
    let comment_like_repo = CommentLikeRepository::new(empty());

    let access = AccessService::new(teacher_repo.clone(), enrollment_repo.clone());
    let state = AppState {
        user_service: UserService::new(user_repo.clone()),
        class_service: ClassService::new(
            class_repo.clone(),
            teacher_repo,
            enrollment_repo,
            post_repo.clone(),
            user_repo,
            access.clone(),
        ),
        post_service: PostService::new(
            post_repo.clone(),
            class_repo.clone(),
            UserRepository::new(empty()),
            comment_repo.clone(),
            post_like_repo.clone(),
            access.clone(),
        ),
        comment_service: CommentService::new(
            comment_repo.clone(),
            post_repo.clone(),
            class_repo.clone(),
            UserRepository::new(empty()),
            comment_like_repo.clone(),
            access.clone(),
        ),
        like_service: LikeService::new(
            post_repo,
            comment_repo,
            class_repo,
            post_like_repo,
            comment_like_repo,
            access,
        ),
    };

    Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

#[tokio::test]
async fn test_unauthenticated_request_is_rejected() {
    let app = test_app(mock(), mock(), mock(), mock(), mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/classes")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let student = test_user("u1", user::UserRole::Student, "tok-1");
    let user_db = mock()
        // auth middleware token lookup, then the profile read
        .append_query_results([[student.clone()], [student]]);

    let app = test_app(user_db, mock(), mock(), mock(), mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .method("GET")
                .header("Authorization", "Bearer tok-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_class_is_not_found() {
    let student = test_user("u1", user::UserRole::Student, "tok-1");
    let user_db = mock().append_query_results([[student]]);
    let class_db = mock().append_query_results([Vec::<class::Model>::new()]);

    let app = test_app(user_db, class_db, mock(), mock(), mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/classes/missing")
                .method("GET")
                .header("Authorization", "Bearer tok-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unenrolled_student_denied_comment_tree() {
    // The post and class exist, but the bearer of the token is a
    // student with no enrollment: the discussion stays hidden.
    let student = test_user("u1", user::UserRole::Student, "tok-1");
    let user_db = mock().append_query_results([[student]]);
    let class_db = mock().append_query_results([[test_class("c1")]]);
    let post_db = mock().append_query_results([[test_post("p1", "c1")]]);
    let enrollment_db = mock().append_query_results([Vec::<enrollment::Model>::new()]);

    let app = test_app(user_db, class_db, post_db, mock(), enrollment_db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/p1/comments")
                .method("GET")
                .header("Authorization", "Bearer tok-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unenrolled_student_denied_like() {
    let student = test_user("u1", user::UserRole::Student, "tok-1");
    let user_db = mock().append_query_results([[student]]);
    let class_db = mock().append_query_results([[test_class("c1")]]);
    let post_db = mock().append_query_results([[test_post("p1", "c1")]]);
    let enrollment_db = mock().append_query_results([Vec::<enrollment::Model>::new()]);

    let app = test_app(user_db, class_db, post_db, mock(), enrollment_db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/p1/like")
                .method("POST")
                .header("Authorization", "Bearer tok-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_enrolled_student_served_comment_tree() {
    let student = test_user("u1", user::UserRole::Student, "tok-1");
    let user_db = mock().append_query_results([[student]]);
    let class_db = mock().append_query_results([[test_class("c1")]]);
    let post_db = mock().append_query_results([[test_post("p1", "c1")]]);
    let enrollment_db = mock().append_query_results([[enrollment::Model {
        id: "e1".to_string(),
        student_id: "u1".to_string(),
        class_id: "c1".to_string(),
        enrolled_at: Utc::now().into(),
    }]]);
    let comment_db = mock()
        // empty root page, then the root count
        .append_query_results([Vec::<litblogs_db::entities::comment::Model>::new()])
        .append_query_results([[BTreeMap::from([(
            "num_items",
            sea_orm::Value::BigInt(Some(0)),
        )])]]);

    let app = test_app(user_db, class_db, post_db, comment_db, enrollment_db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/p1/comments")
                .method("GET")
                .header("Authorization", "Bearer tok-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_class_as_student_is_forbidden() {
    let student = test_user("u1", user::UserRole::Student, "tok-1");
    let user_db = mock().append_query_results([[student]]);

    let app = test_app(user_db, mock(), mock(), mock(), mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/classes")
                .method("POST")
                .header("Authorization", "Bearer tok-1")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"name":"Literature 101"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_class_with_blank_name_is_rejected() {
    let teacher = test_user("u1", user::UserRole::Teacher, "tok-1");
    let user_db = mock().append_query_results([[teacher]]);

    let app = test_app(user_db, mock(), mock(), mock(), mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/classes")
                .method("POST")
                .header("Authorization", "Bearer tok-1")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"name":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

//! Class endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use litblogs_common::AppResult;
use litblogs_core::{ClassDetails, ClassSummary, CreateClassInput, StudentSummary, UpdateClassInput};
use litblogs_db::entities::class;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Status filter for class listings.
#[derive(Debug, Deserialize)]
pub struct ListClassesQuery {
    #[serde(default = "default_status")]
    pub status: class::ClassStatus,
}

const fn default_status() -> class::ClassStatus {
    class::ClassStatus::Active
}

/// Join class request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinClassRequest {
    pub access_code: String,
}

/// Create a class.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateClassInput>,
) -> AppResult<ApiResponse<ClassSummary>> {
    let class = state.class_service.create(&user, input).await?;
    Ok(ApiResponse::ok(class))
}

/// List the caller's classes.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListClassesQuery>,
) -> AppResult<ApiResponse<Vec<ClassSummary>>> {
    let classes = state.class_service.list_for_user(&user, query.status).await?;
    Ok(ApiResponse::ok(classes))
}

/// Get class details.
async fn details(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> AppResult<ApiResponse<ClassDetails>> {
    let class = state.class_service.get_details(&class_id, &user).await?;
    Ok(ApiResponse::ok(class))
}

/// Update a class.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(input): Json<UpdateClassInput>,
) -> AppResult<ApiResponse<class::Model>> {
    let class = state.class_service.update(&class_id, &user, input).await?;
    Ok(ApiResponse::ok(class))
}

/// Archive a class.
async fn archive(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> AppResult<ApiResponse<class::Model>> {
    let class = state.class_service.archive(&class_id, &user).await?;
    Ok(ApiResponse::ok(class))
}

/// Restore an archived class.
async fn restore(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> AppResult<ApiResponse<class::Model>> {
    let class = state.class_service.restore(&class_id, &user).await?;
    Ok(ApiResponse::ok(class))
}

/// Delete a class.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.class_service.delete(&class_id, &user).await?;
    Ok(crate::response::no_content())
}

/// Join a class with an access code.
async fn join(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<JoinClassRequest>,
) -> AppResult<ApiResponse<ClassSummary>> {
    let class = state.class_service.join(&user, &req.access_code).await?;
    Ok(ApiResponse::ok(class))
}

/// Leave a class.
async fn leave(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.class_service.leave(&class_id, &user).await?;
    Ok(crate::response::no_content())
}

/// List the enrolled students.
async fn students(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> AppResult<ApiResponse<Vec<StudentSummary>>> {
    let students = state.class_service.list_students(&class_id, &user).await?;
    Ok(ApiResponse::ok(students))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/join", post(join))
        .route("/{class_id}", get(details).put(update).delete(delete))
        .route("/{class_id}/archive", post(archive))
        .route("/{class_id}/restore", post(restore))
        .route("/{class_id}/leave", post(leave))
        .route("/{class_id}/students", get(students))
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::SqlErr;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::{PageParams, Pagination};
use crate::models::student::*;
use crate::services::StudentService;
use crate::state::AppState;

/// Register a student.
#[utoipa::path(
    post,
    path = "",
    tag = "Students",
    operation_id = "createStudent",
    summary = "Register a student",
    description = "Creates a student. `student_id`, `email` and `leetcode_id` must be unique. Students without a `leetcode_id` are skipped by background jobs.",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Duplicate student id, email or LeetCode username (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_student(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let new = payload.validate()?;

    let model = StudentService::new(&state.db)
        .create(new)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
                "A student with this student id, email or LeetCode username already exists"
                    .into(),
            ),
            _ => AppError::from(e),
        })?;

    info!(id = model.id, "Student created");
    Ok((StatusCode::CREATED, Json(StudentResponse::from(model))))
}

/// List students.
#[utoipa::path(
    get,
    path = "",
    tag = "Students",
    operation_id = "listStudents",
    summary = "List students",
    description = "Returns students ordered by internal id.",
    params(PageParams),
    responses(
        (status = 200, description = "Page of students", body = StudentListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<StudentListResponse>, AppError> {
    let (page, per_page) = params.resolve();
    let (students, total) = StudentService::new(&state.db).list(page, per_page).await?;

    Ok(Json(StudentListResponse {
        data: students.into_iter().map(Into::into).collect(),
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        },
    }))
}

/// Get a student.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Students",
    operation_id = "getStudent",
    summary = "Get a student",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 200, description = "Student", body = StudentResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentResponse>, AppError> {
    let model = StudentService::new(&state.db)
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))?;
    Ok(Json(model.into()))
}

/// Delete a student.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Students",
    operation_id = "deleteStudent",
    summary = "Delete a student",
    description = "Deletes the student together with its ratings, contest history and weekly stats.",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    // Wait for any in-flight sync of this student before removing its rows.
    let _guard = state.locks.lock(id).await;
    if !StudentService::new(&state.db).delete(id).await? {
        return Err(AppError::NotFound(format!("Student {id} not found")));
    }
    info!(id, "Student deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Get rating and contest aggregates for a student.
#[utoipa::path(
    get,
    path = "/{id}/stats",
    tag = "Students",
    operation_id = "getStudentStats",
    summary = "Get student statistics",
    description = "Current rating (latest `recorded_at`), highest rating and contest aggregates.",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 200, description = "Aggregates", body = StudentStatsResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_student_stats(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentStatsResponse>, AppError> {
    super::ensure_student(&state, id).await?;
    let stats = StudentService::new(&state.db).stats(id).await?;
    Ok(Json(stats.into()))
}

/// Rank students by current rating.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "Students",
    operation_id = "getLeaderboard",
    summary = "Get the leaderboard",
    description = "Students with at least one rating, ordered by their most recent rating, highest first. Optionally narrowed to one department and batch.",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Ranked students", body = LeaderboardResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let entries = StudentService::new(&state.db)
        .leaderboard(&params.into())
        .await?;
    Ok(Json(entries.into()))
}

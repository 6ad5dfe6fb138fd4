use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::weekly_stats::*;
use crate::services::StudentService;
use crate::state::AppState;

/// List a student's weekly snapshots.
#[utoipa::path(
    get,
    path = "/{id}/weekly-stats",
    tag = "Weekly Stats",
    operation_id = "listWeeklyStats",
    summary = "List weekly statistics",
    description = "Every snapshot recorded by the weekly job, newest week first.",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 200, description = "Weekly snapshots", body = WeeklyStatsListResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_weekly_stats(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<WeeklyStatsListResponse>, AppError> {
    super::ensure_student(&state, id).await?;
    let rows = StudentService::new(&state.db).weekly_stats(id).await?;
    Ok(Json(WeeklyStatsListResponse {
        data: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Get this week's snapshot.
#[utoipa::path(
    get,
    path = "/{id}/current-week",
    tag = "Weekly Stats",
    operation_id = "getCurrentWeekStats",
    summary = "Get current week statistics",
    description = "The snapshot of the week that began at the most recent schedule anchor.",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 200, description = "Current week snapshot", body = WeeklyStatsResponse),
        (status = 404, description = "Student not found or nothing recorded this week (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_current_week(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<WeeklyStatsResponse>, AppError> {
    super::ensure_student(&state, id).await?;
    let week_start = state.config.jobs.anchor().week_start(Utc::now());
    StudentService::new(&state.db)
        .week(id, week_start)
        .await?
        .map(|m| Json(m.into()))
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No weekly stats for student {id} in the week of {week_start}"
            ))
        })
}

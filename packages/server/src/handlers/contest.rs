use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::models::contest::*;
use crate::services::StudentService;
use crate::state::AppState;

/// List a student's contest history.
#[utoipa::path(
    get,
    path = "/{id}/contest-history",
    tag = "Contest History",
    operation_id = "listContestHistory",
    summary = "List contest history",
    description = "The last reconciled snapshot of the student's attended contests, most recent first.",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 200, description = "Contest history", body = ContestHistoryListResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_contest_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestHistoryListResponse>, AppError> {
    super::ensure_student(&state, id).await?;
    let entries = StudentService::new(&state.db).contest_history(id).await?;
    Ok(Json(ContestHistoryListResponse {
        data: entries.into_iter().map(Into::into).collect(),
    }))
}

/// Reconcile one student's contest history now.
#[utoipa::path(
    post,
    path = "/{id}/contest-history",
    tag = "Contest History",
    operation_id = "syncContestHistory",
    summary = "Reconcile contest history",
    description = "Fetches the student's contest history and replaces the stored set atomically. Stored rows are left untouched when the fetch fails.",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 200, description = "History replaced", body = ContestSyncResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "No LeetCode username or unknown LeetCode user (NO_EXTERNAL_USERNAME, PROVIDER_USER_NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Unusable provider data (PROVIDER_MALFORMED_DATA)", body = ErrorBody),
        (status = 503, description = "Provider unavailable (PROVIDER_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn sync_contest_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestSyncResponse>, AppError> {
    let entries_written = state.reconciler.reconcile_student(id).await?;
    info!(student_id = id, entries_written, "Contest history reconciled");
    Ok(Json(ContestSyncResponse {
        student_id: id,
        entries_written,
    }))
}

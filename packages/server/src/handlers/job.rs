use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use common::JobKind;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::jobs::JobStatus;
use crate::models::job::*;
use crate::state::AppState;

/// Start a pass over every student.
#[utoipa::path(
    post,
    path = "/{kind}",
    tag = "Jobs",
    operation_id = "triggerJob",
    summary = "Trigger a batch job",
    description = "Starts a `rating`, `contest_history` or `weekly_stats` pass in the background. Poll `GET /jobs/runs/{id}` for progress.",
    params(("kind" = String, Path, description = "Job kind: rating, contest_history or weekly_stats")),
    responses(
        (status = 202, description = "Job accepted", body = JobStatus),
        (status = 400, description = "Unknown job kind (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "A job of this kind is running (JOB_ALREADY_RUNNING)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn trigger_job(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<(StatusCode, Json<JobStatus>), AppError> {
    let kind: JobKind = kind.parse().map_err(AppError::Validation)?;
    let status = state.jobs.trigger(kind)?;
    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// List recent job runs.
#[utoipa::path(
    get,
    path = "",
    tag = "Jobs",
    operation_id = "listJobs",
    summary = "List job runs",
    description = "Recent manual and scheduled runs, newest first.",
    responses(
        (status = 200, description = "Job runs", body = JobListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    Json(JobListResponse {
        data: state.jobs.list(),
    })
}

/// Get one job run.
#[utoipa::path(
    get,
    path = "/runs/{id}",
    tag = "Jobs",
    operation_id = "getJob",
    summary = "Get job status",
    description = "Counters are live while the run is in progress.",
    params(("id" = Uuid, Path, description = "Job run ID")),
    responses(
        (status = 200, description = "Job status", body = JobStatus),
        (status = 404, description = "Unknown job id (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobStatus>, AppError> {
    state
        .jobs
        .status(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

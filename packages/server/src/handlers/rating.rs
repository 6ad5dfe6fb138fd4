use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::rating::*;
use crate::services::StudentService;
use crate::state::AppState;

/// List a student's ratings.
#[utoipa::path(
    get,
    path = "/{id}/ratings",
    tag = "Ratings",
    operation_id = "listRatings",
    summary = "List rating history",
    description = "Every recorded rating for the student, newest first. The first entry is the current rating.",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 200, description = "Rating history", body = RatingListResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RatingListResponse>, AppError> {
    super::ensure_student(&state, id).await?;
    let ratings = StudentService::new(&state.db).ratings(id).await?;
    Ok(Json(RatingListResponse {
        data: ratings.into_iter().map(Into::into).collect(),
    }))
}

/// Recompute one student's rating now.
#[utoipa::path(
    post,
    path = "/{id}/rating",
    tag = "Ratings",
    operation_id = "updateRating",
    summary = "Recompute a student's rating",
    description = "Fetches fresh stats from LeetCode (up to 3 attempts with 1s/2s backoff) and appends a new rating.",
    params(("id" = i32, Path, description = "Internal student ID")),
    responses(
        (status = 201, description = "Rating recorded", body = RatingResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "No LeetCode username or unknown LeetCode user (NO_EXTERNAL_USERNAME, PROVIDER_USER_NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Unusable provider data (PROVIDER_MALFORMED_DATA, ZERO_VALUE_DATA)", body = ErrorBody),
        (status = 503, description = "Provider unavailable after retries (PROVIDER_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn update_rating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RatingResponse>), AppError> {
    let recorded = state.ratings.update_student(id).await?;
    Ok((StatusCode::CREATED, Json(recorded.into())))
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use leetcode::ProviderError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::jobs::JobError;
use crate::services::SyncError;
use crate::store::StoreError;

/// Hint attached to every provider failure.
pub const PROVIDER_HINT: &str = "invalid username, rate limiting, or provider outage";

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `CONFLICT`, `NO_EXTERNAL_USERNAME`, `PROVIDER_USER_NOT_FOUND`,
    /// `PROVIDER_UNAVAILABLE`, `PROVIDER_MALFORMED_DATA`, `ZERO_VALUE_DATA`,
    /// `JOB_ALREADY_RUNNING`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Email must contain '@'")]
    pub message: String,
    /// Likely causes, set for provider failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "invalid username, rate limiting, or provider outage")]
    pub hint: Option<&'static str>,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(mut self) -> Self {
        self.hint = Some(PROVIDER_HINT);
        self
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    NoExternalUsername(i32),
    ProviderUserNotFound(String),
    /// Provider throttled or unreachable after retries. Carries the upstream
    /// `Retry-After` in seconds when one was sent.
    ProviderUnavailable {
        message: String,
        retry_after: Option<u64>,
    },
    ProviderMalformedData(String),
    ZeroValueData(String),
    JobAlreadyRunning(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg)),
            AppError::NoExternalUsername(id) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody::new(
                    "NO_EXTERNAL_USERNAME",
                    format!("Student {id} has no LeetCode username configured"),
                ),
            ),
            AppError::ProviderUserNotFound(username) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody::new(
                    "PROVIDER_USER_NOT_FOUND",
                    format!("LeetCode user '{username}' does not exist"),
                )
                .with_hint(),
            ),
            AppError::ProviderUnavailable { message, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody::new("PROVIDER_UNAVAILABLE", message).with_hint(),
            ),
            AppError::ProviderMalformedData(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody::new("PROVIDER_MALFORMED_DATA", msg).with_hint(),
            ),
            AppError::ZeroValueData(username) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody::new(
                    "ZERO_VALUE_DATA",
                    format!("LeetCode returned all-zero stats for '{username}'"),
                )
                .with_hint(),
            ),
            AppError::JobAlreadyRunning(msg) => (
                StatusCode::CONFLICT,
                ErrorBody::new("JOB_ALREADY_RUNNING", msg),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", "An unexpected error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after = match &self {
            AppError::ProviderUnavailable { retry_after, .. } => *retry_after,
            _ => None,
        };

        let (status, body) = self.status_and_body();

        if let Some(seconds) = retry_after {
            (status, [("Retry-After", seconds.to_string())], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        tracing::warn!(kind = err.kind(), error = %err, "Provider request failed");
        match err {
            ProviderError::NotFound(username) => AppError::ProviderUserNotFound(username),
            ProviderError::RateLimited { retry_after_secs } => AppError::ProviderUnavailable {
                message: "LeetCode is rate limiting requests".into(),
                retry_after: retry_after_secs,
            },
            ProviderError::Transport(msg) => AppError::ProviderUnavailable {
                message: format!("LeetCode is unreachable: {msg}"),
                retry_after: None,
            },
            ProviderError::MalformedData(msg) => AppError::ProviderMalformedData(msg),
            ProviderError::ZeroValueData(username) => AppError::ZeroValueData(username),
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::StudentNotFound(id) => AppError::NotFound(format!("Student {id} not found")),
            SyncError::MissingUsername(id) => AppError::NoExternalUsername(id),
            SyncError::Provider(e) => e.into(),
            SyncError::Store(e) => e.into(),
        }
    }
}

impl From<JobError> for AppError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::AlreadyRunning(_) => AppError::JobAlreadyRunning(err.to_string()),
            JobError::Unsupported(_) => AppError::Validation(err.to_string()),
            JobError::AlreadyStarted(_) => AppError::Internal(err.to_string()),
        }
    }
}

pub mod contest;
pub mod job;
pub mod rating;
pub mod student;
pub mod weekly_stats;

use crate::error::AppError;
use crate::services::StudentService;
use crate::state::AppState;

/// 404 unless the student exists.
pub(crate) async fn ensure_student(state: &AppState, id: i32) -> Result<(), AppError> {
    StudentService::new(&state.db)
        .get(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))
}

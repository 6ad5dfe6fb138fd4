use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::contest_history;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestHistoryResponse {
    pub id: i32,
    pub student_id: i32,
    #[schema(example = "Weekly Contest 400")]
    pub contest_title: String,
    /// Rating after the contest.
    #[schema(example = 1512.3)]
    pub rating: f64,
    #[schema(example = 812)]
    pub ranking: i32,
    #[schema(example = 3)]
    pub problems_solved: i32,
    #[schema(example = 4100)]
    pub finish_time_seconds: i64,
    pub contest_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<contest_history::Model> for ContestHistoryResponse {
    fn from(m: contest_history::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            contest_title: m.contest_title,
            rating: m.rating,
            ranking: m.ranking,
            problems_solved: m.problems_solved,
            finish_time_seconds: m.finish_time_seconds,
            contest_date: m.contest_date,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestHistoryListResponse {
    /// Most recent contest first.
    pub data: Vec<ContestHistoryResponse>,
}

/// Result of a single-student reconciliation.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestSyncResponse {
    #[schema(example = 1)]
    pub student_id: i32,
    /// Entries now stored for the student.
    #[schema(example = 12)]
    pub entries_written: usize,
}

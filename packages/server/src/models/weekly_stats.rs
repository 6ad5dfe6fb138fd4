use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::weekly_stats;

/// Solved counts captured by the weekly job.
#[derive(Serialize, utoipa::ToSchema)]
pub struct WeeklyStatsResponse {
    pub id: i32,
    pub student_id: i32,
    /// Anchor instant that opens the week.
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    #[schema(example = 17)]
    pub total_solved: i32,
    #[schema(example = 10)]
    pub easy_solved: i32,
    #[schema(example = 5)]
    pub medium_solved: i32,
    #[schema(example = 2)]
    pub hard_solved: i32,
    #[schema(example = 1500.0)]
    pub contest_rating: f64,
    #[schema(example = 120345)]
    pub global_rank: i32,
    pub created_at: DateTime<Utc>,
}

impl From<weekly_stats::Model> for WeeklyStatsResponse {
    fn from(m: weekly_stats::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            week_start: m.week_start,
            week_end: m.week_end,
            total_solved: m.total_solved,
            easy_solved: m.easy_solved,
            medium_solved: m.medium_solved,
            hard_solved: m.hard_solved,
            contest_rating: m.contest_rating,
            global_rank: m.global_rank,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct WeeklyStatsListResponse {
    /// Newest week first.
    pub data: Vec<WeeklyStatsResponse>,
}

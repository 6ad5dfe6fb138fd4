use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::rating;
use crate::services::RecordedRating;

#[derive(Serialize, utoipa::ToSchema)]
pub struct RatingResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = 1)]
    pub student_id: i32,
    /// `easy*1 + medium*3 + hard*5 + floor(contest_rating*0.2)`.
    #[schema(example = 335)]
    pub rating: i32,
    #[schema(example = 17)]
    pub problems_count: i32,
    #[schema(example = 10)]
    pub easy_count: i32,
    #[schema(example = 5)]
    pub medium_count: i32,
    #[schema(example = 2)]
    pub hard_count: i32,
    #[schema(example = 1500.0)]
    pub contest_rating: f64,
    #[schema(example = 120345)]
    pub global_rank: i32,
    pub recorded_at: DateTime<Utc>,
}

impl From<rating::Model> for RatingResponse {
    fn from(m: rating::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            rating: m.rating,
            problems_count: m.problems_count,
            easy_count: m.easy_count,
            medium_count: m.medium_count,
            hard_count: m.hard_count,
            contest_rating: m.contest_rating,
            global_rank: m.global_rank,
            recorded_at: m.recorded_at,
        }
    }
}

impl From<RecordedRating> for RatingResponse {
    fn from(r: RecordedRating) -> Self {
        let m = r.record;
        Self {
            id: r.id,
            student_id: m.student_id,
            rating: m.rating,
            problems_count: m.problems_count,
            easy_count: m.easy_count,
            medium_count: m.medium_count,
            hard_count: m.hard_count,
            contest_rating: m.contest_rating,
            global_rank: m.global_rank,
            recorded_at: m.recorded_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RatingListResponse {
    /// Newest first.
    pub data: Vec<RatingResponse>,
}

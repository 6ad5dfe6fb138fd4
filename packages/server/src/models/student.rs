use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, require_non_empty};
use crate::entity::student;
use crate::error::AppError;
use crate::services::student::{LeaderboardEntry, LeaderboardFilter, NewStudent, StudentStats};

/// Request body for registering a student.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateStudentRequest {
    /// Institution-issued identifier, unique.
    #[schema(example = "2021CS042")]
    pub student_id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Unique email address.
    #[schema(example = "ada@example.edu")]
    pub email: String,
    /// LeetCode username, unique. Students without one are skipped by jobs.
    #[schema(example = "ada_l")]
    pub leetcode_id: Option<String>,
    #[schema(example = 2025)]
    pub passing_year: Option<i32>,
    #[schema(example = "2021-2025")]
    pub batch: String,
    #[schema(example = "Computer Science")]
    pub department: String,
}

impl CreateStudentRequest {
    pub fn validate(self) -> Result<NewStudent, AppError> {
        let email = require_non_empty(&self.email, "email")?;
        if !email.contains('@') {
            return Err(AppError::Validation("email must be a valid address".into()));
        }

        let leetcode_id = match self.leetcode_id {
            Some(id) => Some(require_non_empty(&id, "leetcode_id")?),
            None => None,
        };

        Ok(NewStudent {
            student_id: require_non_empty(&self.student_id, "student_id")?,
            name: require_non_empty(&self.name, "name")?,
            email,
            leetcode_id,
            passing_year: self.passing_year,
            batch: require_non_empty(&self.batch, "batch")?,
            department: require_non_empty(&self.department, "department")?,
        })
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "2021CS042")]
    pub student_id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.edu")]
    pub email: String,
    #[schema(example = "ada_l")]
    pub leetcode_id: Option<String>,
    pub passing_year: Option<i32>,
    pub batch: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<student::Model> for StudentResponse {
    fn from(m: student::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            name: m.name,
            email: m.email,
            leetcode_id: m.leetcode_id,
            passing_year: m.passing_year,
            batch: m.batch,
            department: m.department,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentListResponse {
    pub data: Vec<StudentResponse>,
    pub pagination: Pagination,
}

/// Aggregates over a student's ratings and contest history.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentStatsResponse {
    #[schema(example = 1)]
    pub student_id: i32,
    /// Rating of the most recent measurement.
    #[schema(example = 335)]
    pub current_rating: Option<i32>,
    #[schema(example = 352)]
    pub highest_rating: Option<i32>,
    /// Total solved problems at the most recent measurement.
    #[schema(example = 17)]
    pub problems_count: Option<i32>,
    #[schema(example = 120345)]
    pub global_rank: Option<i32>,
    pub last_updated: Option<DateTime<Utc>>,
    #[schema(example = 4)]
    pub contests_participated: u64,
    pub average_contest_rating: Option<f64>,
    /// Best (lowest) ranking across attended contests.
    pub best_ranking: Option<i32>,
    pub total_contest_problems_solved: i64,
    pub latest_contest_rating: Option<f64>,
}

impl From<StudentStats> for StudentStatsResponse {
    fn from(s: StudentStats) -> Self {
        Self {
            student_id: s.student_id,
            current_rating: s.current.as_ref().map(|r| r.rating),
            highest_rating: s.highest_rating,
            problems_count: s.current.as_ref().map(|r| r.problems_count),
            global_rank: s.current.as_ref().map(|r| r.global_rank),
            last_updated: s.current.as_ref().map(|r| r.recorded_at),
            contests_participated: s.contests_participated,
            average_contest_rating: s.average_contest_rating,
            best_ranking: s.best_ranking,
            total_contest_problems_solved: s.total_contest_problems_solved,
            latest_contest_rating: s.latest_contest_rating,
        }
    }
}

/// Leaderboard filters. Blank values are ignored.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LeaderboardParams {
    /// Exact department match.
    #[param(example = "Computer Science")]
    pub department: Option<String>,
    /// Exact batch match.
    #[param(example = "2021-2025")]
    pub batch: Option<String>,
}

impl From<LeaderboardParams> for LeaderboardFilter {
    fn from(p: LeaderboardParams) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Self {
            department: clean(p.department),
            batch: clean(p.batch),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardEntryResponse {
    /// 1-based position.
    #[schema(example = 1)]
    pub rank: usize,
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "2021CS042")]
    pub student_id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub leetcode_id: Option<String>,
    pub department: String,
    pub batch: String,
    /// Rating of the most recent measurement.
    #[schema(example = 335)]
    pub rating: i32,
    #[schema(example = 17)]
    pub problems_count: i32,
    pub recorded_at: DateTime<Utc>,
}

impl LeaderboardEntryResponse {
    fn new(rank: usize, entry: LeaderboardEntry) -> Self {
        let LeaderboardEntry { student, current } = entry;
        Self {
            rank,
            id: student.id,
            student_id: student.student_id,
            name: student.name,
            leetcode_id: student.leetcode_id,
            department: student.department,
            batch: student.batch,
            rating: current.rating,
            problems_count: current.problems_count,
            recorded_at: current.recorded_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardResponse {
    /// Highest current rating first.
    pub data: Vec<LeaderboardEntryResponse>,
}

impl From<Vec<LeaderboardEntry>> for LeaderboardResponse {
    fn from(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            data: entries
                .into_iter()
                .enumerate()
                .map(|(i, e)| LeaderboardEntryResponse::new(i + 1, e))
                .collect(),
        }
    }
}

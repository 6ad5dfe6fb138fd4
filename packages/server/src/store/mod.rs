//! Persistence seams used by the sync services and background jobs.

mod db;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

use crate::entity::student;

pub use db::SeaOrmStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to delete contest history: {0}")]
    Delete(DbErr),

    #[error("Failed to insert contest history: {0}")]
    Insert(DbErr),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// The part of a student record the sync paths need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRef {
    pub id: i32,
    pub name: String,
    pub leetcode_id: Option<String>,
}

impl StudentRef {
    /// The LeetCode username, or `None` when unset or blank.
    pub fn username(&self) -> Option<&str> {
        self.leetcode_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl From<student::Model> for StudentRef {
    fn from(m: student::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            leetcode_id: m.leetcode_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub student_id: i32,
    pub rating: i32,
    pub problems_count: i32,
    pub easy_count: i32,
    pub medium_count: i32,
    pub hard_count: i32,
    pub contest_rating: f64,
    pub global_rank: i32,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContestEntry {
    pub contest_title: String,
    pub rating: f64,
    pub ranking: i32,
    pub problems_solved: i32,
    pub finish_time_seconds: i64,
    pub contest_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWeeklyStats {
    pub student_id: i32,
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub total_solved: i32,
    pub easy_solved: i32,
    pub medium_solved: i32,
    pub hard_solved: i32,
    pub contest_rating: f64,
    pub global_rank: i32,
}

/// Paged, read-only view of the student population.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// 1-based `page`, ordered by internal id. An empty page means the end.
    async fn list(&self, page: u64, page_size: u64) -> Result<Vec<StudentRef>, StoreError>;

    async fn get(&self, id: i32) -> Result<Option<StudentRef>, StoreError>;
}

/// Writes performed by the sync paths.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Returns the id of the new row.
    async fn append_rating(&self, rating: NewRating) -> Result<i32, StoreError>;

    /// Atomically replaces every contest history row of `student_id`.
    ///
    /// Either the old set or the new set is visible afterwards, never an empty
    /// or partial one. Returns the number of rows written.
    async fn replace_contest_history(
        &self,
        student_id: i32,
        entries: Vec<NewContestEntry>,
    ) -> Result<usize, StoreError>;

    /// Insert-or-ignore on (student, week). Returns `false` when a row for
    /// that week already existed.
    async fn insert_weekly_stats(&self, stats: NewWeeklyStats) -> Result<bool, StoreError>;
}

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Solved counts and contest standing of one user, as fetched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StatsSnapshot {
    pub total_solved: i32,
    pub easy_solved: i32,
    pub medium_solved: i32,
    pub hard_solved: i32,
    /// 0.0 for users who never competed.
    pub contest_rating: f64,
    /// 0 for users who never competed.
    pub contest_global_ranking: i32,
    pub attended_contests: i32,
    /// Attended contests only, in provider order.
    pub contest_history: Vec<ContestResult>,
}

impl StatsSnapshot {
    pub fn is_all_zero(&self) -> bool {
        self.total_solved == 0
            && self.easy_solved == 0
            && self.medium_solved == 0
            && self.hard_solved == 0
    }
}

/// A single attended contest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContestResult {
    pub title: String,
    /// Rating after the contest.
    pub rating: f64,
    pub ranking: i32,
    pub problems_solved: i32,
    pub finish_time_seconds: i64,
    /// Contest start, when the provider reports one.
    pub start_time: Option<DateTime<Utc>>,
}

//! Queries and response shapes of the LeetCode GraphQL API.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::models::{ContestResult, StatsSnapshot};

pub const USER_STATS_QUERY: &str = r#"
query userStats($username: String!) {
  matchedUser(username: $username) {
    username
    submitStats { acSubmissionNum { difficulty count } }
  }
  userContestRanking(username: $username) {
    attendedContestsCount
    rating
    globalRanking
  }
  userContestRankingHistory(username: $username) {
    attended
    rating
    ranking
    problemsSolved
    finishTimeInSeconds
    contest { title startTime }
  }
}
"#;

pub const CONTEST_HISTORY_QUERY: &str = r#"
query userContestHistory($username: String!) {
  matchedUser(username: $username) { username }
  userContestRankingHistory(username: $username) {
    attended
    rating
    ranking
    problemsSolved
    finishTimeInSeconds
    contest { title startTime }
  }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
pub struct Variables<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<UserData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub matched_user: Option<MatchedUser>,
    #[serde(default)]
    pub user_contest_ranking: Option<ContestRanking>,
    #[serde(default)]
    pub user_contest_ranking_history: Option<Vec<ContestHistoryNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    #[serde(default)]
    pub submit_stats: Option<SubmitStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    pub ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: String,
    pub count: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestRanking {
    #[serde(default)]
    pub attended_contests_count: i32,
    pub rating: f64,
    pub global_ranking: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestHistoryNode {
    pub attended: bool,
    pub rating: f64,
    pub ranking: i32,
    pub problems_solved: i32,
    pub finish_time_in_seconds: i64,
    pub contest: ContestInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestInfo {
    pub title: String,
    #[serde(default)]
    pub start_time: Option<i64>,
}

impl GraphQlResponse {
    /// Unwraps `data`, turning "user does not exist" into `NotFound`.
    pub fn into_user_data(self, username: &str) -> Result<UserData, ProviderError> {
        if self
            .errors
            .iter()
            .any(|e| e.message.to_lowercase().contains("does not exist"))
        {
            return Err(ProviderError::NotFound(username.to_string()));
        }

        let data = match self.data {
            Some(data) => data,
            None => {
                let message = self
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "response has no data".into());
                return Err(ProviderError::MalformedData(message));
            }
        };

        if data.matched_user.is_none() {
            return Err(ProviderError::NotFound(username.to_string()));
        }
        Ok(data)
    }
}

impl UserData {
    pub fn attended_contests(&self) -> Vec<ContestResult> {
        self.user_contest_ranking_history
            .iter()
            .flatten()
            .filter(|node| node.attended)
            .map(|node| ContestResult {
                title: node.contest.title.clone(),
                rating: node.rating,
                ranking: node.ranking,
                problems_solved: node.problems_solved,
                finish_time_seconds: node.finish_time_in_seconds,
                start_time: node
                    .contest
                    .start_time
                    .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            })
            .collect()
    }

    pub fn into_snapshot(self) -> Result<StatsSnapshot, ProviderError> {
        let contest_history = self.attended_contests();

        let stats = self
            .matched_user
            .and_then(|u| u.submit_stats)
            .ok_or_else(|| ProviderError::MalformedData("missing submitStats".into()))?;

        let mut snapshot = StatsSnapshot {
            contest_history,
            ..Default::default()
        };
        let mut total = None;
        for entry in stats.ac_submission_num {
            match entry.difficulty.as_str() {
                "All" => total = Some(entry.count),
                "Easy" => snapshot.easy_solved = entry.count,
                "Medium" => snapshot.medium_solved = entry.count,
                "Hard" => snapshot.hard_solved = entry.count,
                _ => {}
            }
        }
        snapshot.total_solved = total.unwrap_or(
            snapshot.easy_solved + snapshot.medium_solved + snapshot.hard_solved,
        );

        if let Some(ranking) = self.user_contest_ranking {
            snapshot.contest_rating = ranking.rating;
            snapshot.contest_global_ranking = ranking.global_ranking;
            snapshot.attended_contests = ranking.attended_contests_count;
        }

        Ok(snapshot)
    }
}

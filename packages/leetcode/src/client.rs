use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, REFERER, RETRY_AFTER};
use tracing::{debug, instrument, warn};

use crate::config::LeetCodeConfig;
use crate::error::ProviderError;
use crate::graphql::{
    CONTEST_HISTORY_QUERY, GraphQlRequest, GraphQlResponse, USER_STATS_QUERY, UserData, Variables,
};
use crate::limiter::RateLimiter;
use crate::models::{ContestResult, StatsSnapshot};

/// Source of a user's solved counts and contest record.
///
/// Implementations never retry; callers decide on a retry policy.
#[async_trait]
pub trait ContestDataProvider: Send + Sync {
    /// Solved counts, contest standing and attended contests.
    ///
    /// A syntactically valid all-zero result is reported as
    /// [`ProviderError::ZeroValueData`].
    async fn fetch_user_stats(&self, username: &str) -> Result<StatsSnapshot, ProviderError>;

    /// Attended contests only.
    async fn fetch_contest_history(
        &self,
        username: &str,
    ) -> Result<Vec<ContestResult>, ProviderError>;
}

/// GraphQL client for leetcode.com.
///
/// Holds the process-wide rate limiter, so construct one and share it.
pub struct LeetCodeClient {
    http: reqwest::Client,
    endpoint: String,
    limiter: RateLimiter,
}

impl LeetCodeClient {
    pub fn new(config: &LeetCodeConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            limiter: RateLimiter::new(config.min_interval()),
        })
    }

    async fn query(&self, query: &'static str, username: &str) -> Result<UserData, ProviderError> {
        self.limiter.acquire().await;

        let request = GraphQlRequest {
            query,
            variables: Variables { username },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(REFERER, "https://leetcode.com")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            warn!(%status, ?retry_after_secs, "LeetCode throttled request");
            return Err(ProviderError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "LeetCode returned status {status}"
            )));
        }

        let body = response.text().await?;
        let parsed: GraphQlResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedData(e.to_string()))?;
        parsed.into_user_data(username)
    }
}

#[async_trait]
impl ContestDataProvider for LeetCodeClient {
    #[instrument(skip(self))]
    async fn fetch_user_stats(&self, username: &str) -> Result<StatsSnapshot, ProviderError> {
        let snapshot = self.query(USER_STATS_QUERY, username).await?.into_snapshot()?;
        if snapshot.is_all_zero() {
            return Err(ProviderError::ZeroValueData(username.to_string()));
        }
        debug!(
            total = snapshot.total_solved,
            contest_rating = snapshot.contest_rating,
            "Fetched user stats"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self))]
    async fn fetch_contest_history(
        &self,
        username: &str,
    ) -> Result<Vec<ContestResult>, ProviderError> {
        let history = self
            .query(CONTEST_HISTORY_QUERY, username)
            .await?
            .attended_contests();
        debug!(contests = history.len(), "Fetched contest history");
        Ok(history)
    }
}

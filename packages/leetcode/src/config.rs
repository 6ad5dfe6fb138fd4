use std::time::Duration;

use serde::Deserialize;

/// LeetCode GraphQL client configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LeetCodeConfig {
    /// GraphQL endpoint. Default: "https://leetcode.com/graphql".
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds. Default: 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum spacing between two outbound requests, in milliseconds. Default: 500.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "https://leetcode.com/graphql".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_min_interval_ms() -> u64 {
    500
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; orbit/0.1; +https://leetcode.com)".into()
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            min_interval_ms: default_min_interval_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl LeetCodeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

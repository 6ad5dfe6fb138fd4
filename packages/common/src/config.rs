use std::time::Duration;

use chrono::Weekday;
use serde::Deserialize;
use tracing::warn;

use crate::job::JobKind;
use crate::retry::RetryPolicy;
use crate::schedule::WeeklyAnchor;

/// Schedule of one background job.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct JobScheduleConfig {
    /// Whether the job is scheduled at all. Manual triggers work either way. Default: true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Seconds between runs after the first anchored run. Default: 604800 (7 days).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_enabled() -> bool {
    true
}
fn default_interval_secs() -> u64 {
    7 * 24 * 60 * 60
}

impl Default for JobScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl JobScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Batch pass and scheduling settings shared by all jobs.
#[derive(Debug, Deserialize, Clone)]
pub struct JobsConfig {
    /// Students per directory page. Default: 10.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Delay between two students in a pass, in milliseconds. Default: 500.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Weekday of the first run. Default: "Sun".
    #[serde(default = "default_anchor_weekday")]
    pub anchor_weekday: Weekday,
    /// UTC hour of the first run. Default: 0.
    #[serde(default)]
    pub anchor_hour: u32,
    /// Retry used by the interactive rating path.
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub rating: JobScheduleConfig,
    #[serde(default)]
    pub contest_history: JobScheduleConfig,
    #[serde(default)]
    pub weekly_stats: JobScheduleConfig,
}

fn default_page_size() -> u64 {
    10
}
fn default_throttle_ms() -> u64 {
    500
}
fn default_anchor_weekday() -> Weekday {
    Weekday::Sun
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            throttle_ms: default_throttle_ms(),
            anchor_weekday: default_anchor_weekday(),
            anchor_hour: 0,
            retry: RetryPolicy::default(),
            rating: JobScheduleConfig::default(),
            contest_history: JobScheduleConfig::default(),
            weekly_stats: JobScheduleConfig::default(),
        }
    }
}

impl JobsConfig {
    pub fn schedule_for(&self, kind: JobKind) -> &JobScheduleConfig {
        match kind {
            JobKind::Rating => &self.rating,
            JobKind::ContestHistory => &self.contest_history,
            JobKind::WeeklyStats => &self.weekly_stats,
        }
    }

    /// Rejects settings that cannot be scheduled.
    pub fn validate(&self) -> Result<(), String> {
        if WeeklyAnchor::new(self.anchor_weekday, self.anchor_hour).is_none() {
            return Err(format!(
                "jobs.anchor_hour must be in 0..24, got {}",
                self.anchor_hour
            ));
        }
        Ok(())
    }

    /// The configured anchor, or Sunday 00:00 when `anchor_hour` is out of range.
    pub fn anchor(&self) -> WeeklyAnchor {
        WeeklyAnchor::new(self.anchor_weekday, self.anchor_hour).unwrap_or_else(|| {
            warn!(
                anchor_hour = self.anchor_hour,
                "Invalid anchor hour, falling back to Sunday 00:00 UTC"
            );
            WeeklyAnchor::default()
        })
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.max(1)
    }
}

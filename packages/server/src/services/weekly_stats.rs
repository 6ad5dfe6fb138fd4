use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{JobKind, WeeklyAnchor};
use leetcode::ContestDataProvider;
use tracing::debug;

use super::{StudentLocks, SyncError, fetch_stats};
use crate::jobs::StudentTask;
use crate::store::{HistoryStore, NewWeeklyStats, StudentRef};

/// Records one solved-count snapshot per student and week.
pub struct WeeklyStatsService {
    store: Arc<dyn HistoryStore>,
    provider: Arc<dyn ContestDataProvider>,
    locks: Arc<StudentLocks>,
    anchor: WeeklyAnchor,
}

impl WeeklyStatsService {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        provider: Arc<dyn ContestDataProvider>,
        locks: Arc<StudentLocks>,
        anchor: WeeklyAnchor,
    ) -> Self {
        Self {
            store,
            provider,
            locks,
            anchor,
        }
    }

    /// Returns `false` when this week's row already existed.
    pub async fn record_week(
        &self,
        student: &StudentRef,
        now: DateTime<Utc>,
    ) -> Result<bool, SyncError> {
        let username = student
            .username()
            .ok_or(SyncError::MissingUsername(student.id))?;

        let _guard = self.locks.lock(student.id).await;
        let snapshot = fetch_stats(self.provider.as_ref(), username).await?;

        let week_start = self.anchor.week_start(now);
        let written = self
            .store
            .insert_weekly_stats(NewWeeklyStats {
                student_id: student.id,
                week_start,
                week_end: week_start + chrono::Duration::days(7),
                total_solved: snapshot.total_solved,
                easy_solved: snapshot.easy_solved,
                medium_solved: snapshot.medium_solved,
                hard_solved: snapshot.hard_solved,
                contest_rating: snapshot.contest_rating,
                global_rank: snapshot.contest_global_ranking,
            })
            .await?;

        if !written {
            debug!(student_id = student.id, %week_start, "Weekly stats already recorded");
        }
        Ok(written)
    }
}

#[async_trait]
impl StudentTask for WeeklyStatsService {
    fn kind(&self) -> JobKind {
        JobKind::WeeklyStats
    }

    async fn run(&self, student: &StudentRef) -> Result<(), SyncError> {
        self.record_week(student, Utc::now()).await.map(|_| ())
    }
}

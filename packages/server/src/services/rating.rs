use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{JobKind, RatingBreakdown, RetryPolicy, retry_with_backoff};
use leetcode::{ContestDataProvider, ProviderError, StatsSnapshot};
use tracing::{info, instrument};

use super::{StudentLocks, SyncError, fetch_stats};
use crate::jobs::StudentTask;
use crate::store::{HistoryStore, NewRating, StudentDirectory, StudentRef};

/// A rating row that was just appended.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRating {
    pub id: i32,
    pub record: NewRating,
}

/// Fetches stats, computes the composite rating and appends it.
pub struct RatingService {
    directory: Arc<dyn StudentDirectory>,
    store: Arc<dyn HistoryStore>,
    provider: Arc<dyn ContestDataProvider>,
    locks: Arc<StudentLocks>,
    retry: RetryPolicy,
}

impl RatingService {
    pub fn new(
        directory: Arc<dyn StudentDirectory>,
        store: Arc<dyn HistoryStore>,
        provider: Arc<dyn ContestDataProvider>,
        locks: Arc<StudentLocks>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            directory,
            store,
            provider,
            locks,
            retry,
        }
    }

    /// Interactive path: looks the student up and retries the fetch with
    /// linear backoff. All-zero stats count as a failed attempt.
    #[instrument(skip(self))]
    pub async fn update_student(&self, student_id: i32) -> Result<RecordedRating, SyncError> {
        let student = self
            .directory
            .get(student_id)
            .await?
            .ok_or(SyncError::StudentNotFound(student_id))?;
        let username = student
            .username()
            .ok_or(SyncError::MissingUsername(student_id))?;

        let _guard = self.locks.lock(student_id).await;
        let snapshot = retry_with_backoff(&self.retry, ProviderError::is_retryable, || {
            fetch_stats(self.provider.as_ref(), username)
        })
        .await?;

        self.record(student_id, &snapshot).await
    }

    /// Batch path: a single attempt, the pass decides what to do on failure.
    pub async fn update_entry(&self, student: &StudentRef) -> Result<RecordedRating, SyncError> {
        let username = student
            .username()
            .ok_or(SyncError::MissingUsername(student.id))?;

        let _guard = self.locks.lock(student.id).await;
        let snapshot = fetch_stats(self.provider.as_ref(), username).await?;
        self.record(student.id, &snapshot).await
    }

    async fn record(
        &self,
        student_id: i32,
        snapshot: &StatsSnapshot,
    ) -> Result<RecordedRating, SyncError> {
        let breakdown = RatingBreakdown::compute(
            snapshot.easy_solved,
            snapshot.medium_solved,
            snapshot.hard_solved,
            snapshot.contest_rating,
        );

        let record = NewRating {
            student_id,
            rating: breakdown.rating,
            problems_count: snapshot.total_solved,
            easy_count: snapshot.easy_solved,
            medium_count: snapshot.medium_solved,
            hard_count: snapshot.hard_solved,
            contest_rating: snapshot.contest_rating,
            global_rank: snapshot.contest_global_ranking,
            recorded_at: Utc::now(),
        };
        let id = self.store.append_rating(record.clone()).await?;

        info!(
            student_id,
            rating = breakdown.rating,
            problem_rating = breakdown.problem_rating,
            contest_bonus = breakdown.contest_bonus,
            "Recorded rating"
        );
        Ok(RecordedRating { id, record })
    }
}

#[async_trait]
impl StudentTask for RatingService {
    fn kind(&self) -> JobKind {
        JobKind::Rating
    }

    async fn run(&self, student: &StudentRef) -> Result<(), SyncError> {
        self.update_entry(student).await.map(|_| ())
    }
}

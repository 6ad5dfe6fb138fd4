use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::JobKind;
use leetcode::{ContestDataProvider, ContestResult};
use tracing::{info, instrument};

use super::{StudentLocks, SyncError};
use crate::jobs::StudentTask;
use crate::store::{HistoryStore, NewContestEntry, StudentDirectory, StudentRef};

/// Replaces a student's stored contest history with the provider's current one.
pub struct Reconciler {
    directory: Arc<dyn StudentDirectory>,
    store: Arc<dyn HistoryStore>,
    provider: Arc<dyn ContestDataProvider>,
    locks: Arc<StudentLocks>,
}

impl Reconciler {
    pub fn new(
        directory: Arc<dyn StudentDirectory>,
        store: Arc<dyn HistoryStore>,
        provider: Arc<dyn ContestDataProvider>,
        locks: Arc<StudentLocks>,
    ) -> Self {
        Self {
            directory,
            store,
            provider,
            locks,
        }
    }

    /// Look the student up, then [`reconcile`](Self::reconcile).
    #[instrument(skip(self))]
    pub async fn reconcile_student(&self, student_id: i32) -> Result<usize, SyncError> {
        let student = self
            .directory
            .get(student_id)
            .await?
            .ok_or(SyncError::StudentNotFound(student_id))?;
        let username = student
            .username()
            .ok_or(SyncError::MissingUsername(student_id))?;
        self.reconcile(student_id, username).await
    }

    /// Fetch first; stored rows are only touched once fresh data is in hand.
    /// Returns the number of entries written.
    pub async fn reconcile(&self, student_id: i32, username: &str) -> Result<usize, SyncError> {
        let _guard = self.locks.lock(student_id).await;

        let fetched = self.provider.fetch_contest_history(username).await?;
        let entries = to_entries(fetched);
        let written = self
            .store
            .replace_contest_history(student_id, entries)
            .await?;

        info!(student_id, written, "Reconciled contest history");
        Ok(written)
    }
}

/// Stamp missing contest dates with the reconciliation time and keep one
/// entry per title (the last one wins).
fn to_entries(results: Vec<ContestResult>) -> Vec<NewContestEntry> {
    let now = Utc::now();
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<NewContestEntry> = Vec::with_capacity(results.len());

    for r in results {
        let entry = NewContestEntry {
            contest_title: r.title,
            rating: r.rating,
            ranking: r.ranking,
            problems_solved: r.problems_solved,
            finish_time_seconds: r.finish_time_seconds,
            contest_date: r.start_time.unwrap_or(now),
        };
        match position.get(&entry.contest_title) {
            Some(&i) => entries[i] = entry,
            None => {
                position.insert(entry.contest_title.clone(), entries.len());
                entries.push(entry);
            }
        }
    }
    entries
}

#[async_trait]
impl StudentTask for Reconciler {
    fn kind(&self) -> JobKind {
        JobKind::ContestHistory
    }

    async fn run(&self, student: &StudentRef) -> Result<(), SyncError> {
        let username = student
            .username()
            .ok_or(SyncError::MissingUsername(student.id))?;
        self.reconcile(student.id, username).await.map(|_| ())
    }
}

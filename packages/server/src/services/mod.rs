pub mod locks;
pub mod rating;
pub mod reconcile;
pub mod student;
pub mod weekly_stats;

use leetcode::{ContestDataProvider, ProviderError, StatsSnapshot};
use thiserror::Error;

use crate::store::StoreError;

pub use locks::StudentLocks;
pub use rating::{RatingService, RecordedRating};
pub use reconcile::Reconciler;
pub use student::StudentService;
pub use weekly_stats::WeeklyStatsService;

/// Failure of one student's sync operation.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Student {0} not found")]
    StudentNotFound(i32),

    #[error("Student {0} has no LeetCode username")]
    MissingUsername(i32),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StudentNotFound(_) => "student_not_found",
            Self::MissingUsername(_) => "missing_username",
            Self::Provider(e) => e.kind(),
            Self::Store(_) => "persistence",
        }
    }
}

/// Fetch stats, rejecting all-zero snapshots whatever the provider reports.
pub(crate) async fn fetch_stats(
    provider: &dyn ContestDataProvider,
    username: &str,
) -> Result<StatsSnapshot, ProviderError> {
    let snapshot = provider.fetch_user_stats(username).await?;
    if snapshot.is_all_zero() {
        return Err(ProviderError::ZeroValueData(username.to_string()));
    }
    Ok(snapshot)
}

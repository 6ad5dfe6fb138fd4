use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use common::JobsConfig;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::StudentTask;
use crate::services::SyncError;
use crate::store::{StoreError, StudentDirectory};

#[derive(Debug, Clone, Copy)]
pub struct PassConfig {
    pub page_size: u64,
    /// Pause after each student whose data was fetched.
    pub throttle: Duration,
}

impl From<&JobsConfig> for PassConfig {
    fn from(config: &JobsConfig) -> Self {
        Self {
            page_size: config.page_size(),
            throttle: config.throttle(),
        }
    }
}

/// Live counters of a running pass, readable while it runs.
#[derive(Debug, Default)]
pub struct PassCounters {
    processed: AtomicU64,
    failed: AtomicU64,
}

impl PassCounters {
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub processed: u64,
    pub failed: u64,
    pub duration: Duration,
    /// The pass stopped early on cancellation.
    pub cancelled: bool,
}

/// Walk the whole directory page by page and apply `task` to every student.
///
/// A student's failure is counted and logged, never fatal. Cancellation is
/// observed between students and during the throttle pause. Only a failing
/// directory read aborts the pass.
pub async fn run_pass(
    directory: &dyn StudentDirectory,
    task: &dyn StudentTask,
    config: PassConfig,
    counters: &PassCounters,
    cancel: &CancellationToken,
) -> Result<PassSummary, StoreError> {
    let job = task.kind();
    let started = Instant::now();
    let mut cancelled = false;
    let mut page = 1u64;

    'pages: loop {
        let students = directory.list(page, config.page_size).await?;
        if students.is_empty() {
            break;
        }
        debug!(%job, page, count = students.len(), "Processing page");

        for student in &students {
            if cancel.is_cancelled() {
                cancelled = true;
                break 'pages;
            }

            let result = task.run(student).await;
            let fetched = !matches!(result, Err(SyncError::MissingUsername(_)));
            match result {
                Ok(()) => {
                    counters.processed.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        %job,
                        student_id = student.id,
                        kind = e.kind(),
                        error = %e,
                        "Student failed, continuing"
                    );
                }
            }

            if fetched && !config.throttle.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        cancelled = true;
                        break 'pages;
                    }
                    _ = tokio::time::sleep(config.throttle) => {}
                }
            }
        }

        page += 1;
    }

    let summary = PassSummary {
        processed: counters.processed(),
        failed: counters.failed(),
        duration: started.elapsed(),
        cancelled,
    };
    info!(
        %job,
        processed = summary.processed,
        failed = summary.failed,
        duration_ms = summary.duration.as_millis() as u64,
        cancelled,
        "Pass finished"
    );
    Ok(summary)
}

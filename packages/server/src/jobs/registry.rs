use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{JobKind, JobState, JobTrigger};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{PassConfig, PassCounters, StudentTask, run_pass};
use crate::store::StudentDirectory;

/// Finished runs kept for status queries.
pub const RETAINED_RUNS: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("A {0} job is already running")]
    AlreadyRunning(JobKind),

    #[error("No task registered for {0} jobs")]
    Unsupported(JobKind),

    #[error("Scheduled {0} job was already started or stopped")]
    AlreadyStarted(JobKind),
}

/// Status of one run, live while it is running.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct JobStatus {
    pub id: Uuid,
    pub kind: JobKind,
    pub trigger: JobTrigger,
    pub state: JobState,
    #[schema(example = 42)]
    pub processed: u64,
    #[schema(example = 1)]
    pub failed: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    /// Set when the pass itself failed.
    pub error: Option<String>,
}

struct RunRecord {
    status: JobStatus,
    counters: Arc<PassCounters>,
}

impl RunRecord {
    fn snapshot(&self) -> JobStatus {
        let mut status = self.status.clone();
        if status.state == JobState::Running {
            status.processed = self.counters.processed();
            status.failed = self.counters.failed();
        }
        status
    }
}

/// Frees the per-kind slot when a run ends, including by panic or drop.
struct ActiveSlot<'a> {
    registry: &'a JobRegistry,
    kind: JobKind,
    id: Uuid,
}

impl Drop for ActiveSlot<'_> {
    fn drop(&mut self) {
        let unfinished = self
            .registry
            .runs
            .get(&self.id)
            .is_some_and(|r| r.status.state == JobState::Running);
        if unfinished {
            warn!(kind = %self.kind, job_id = %self.id, "Job aborted before finishing");
            self.registry
                .finish(self.id, JobState::Failed, Some("Job aborted".into()));
        }
        self.registry.active.remove(&self.kind);
        self.registry.prune();
    }
}

/// Runs batch passes with per-kind single-flight and records their status.
pub struct JobRegistry {
    directory: Arc<dyn StudentDirectory>,
    tasks: HashMap<JobKind, Arc<dyn StudentTask>>,
    pass: PassConfig,
    runs: DashMap<Uuid, RunRecord>,
    active: DashMap<JobKind, Uuid>,
    shutdown: CancellationToken,
}

impl JobRegistry {
    pub fn new(
        directory: Arc<dyn StudentDirectory>,
        tasks: Vec<Arc<dyn StudentTask>>,
        pass: PassConfig,
    ) -> Self {
        Self {
            directory,
            tasks: tasks.into_iter().map(|t| (t.kind(), t)).collect(),
            pass,
            runs: DashMap::new(),
            active: DashMap::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Parent token of every run; cancelled by [`shutdown`](Self::shutdown).
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Cancel every in-flight run between students.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Start a manual run in the background and return its initial status.
    pub fn trigger(self: &Arc<Self>, kind: JobKind) -> Result<JobStatus, JobError> {
        let (id, task) = self.begin(kind, JobTrigger::Manual)?;
        let status = self.status(id).ok_or(JobError::Unsupported(kind))?;

        let registry = Arc::clone(self);
        let cancel = self.shutdown.child_token();
        tokio::spawn(async move {
            registry.execute(id, task, &cancel).await;
        });

        Ok(status)
    }

    /// Run a pass inline and return its final status.
    pub async fn run(
        &self,
        kind: JobKind,
        trigger: JobTrigger,
        cancel: &CancellationToken,
    ) -> Result<JobStatus, JobError> {
        let (id, task) = self.begin(kind, trigger)?;
        self.execute(id, task, cancel).await;
        self.status(id).ok_or(JobError::Unsupported(kind))
    }

    pub fn status(&self, id: Uuid) -> Option<JobStatus> {
        self.runs.get(&id).map(|r| r.snapshot())
    }

    /// Recent runs, newest first.
    pub fn list(&self) -> Vec<JobStatus> {
        let mut all: Vec<JobStatus> = self.runs.iter().map(|r| r.snapshot()).collect();
        all.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        all
    }

    pub fn is_running(&self, kind: JobKind) -> bool {
        self.active.contains_key(&kind)
    }

    fn begin(
        &self,
        kind: JobKind,
        trigger: JobTrigger,
    ) -> Result<(Uuid, Arc<dyn StudentTask>), JobError> {
        let task = self
            .tasks
            .get(&kind)
            .cloned()
            .ok_or(JobError::Unsupported(kind))?;

        let id = Uuid::new_v4();
        match self.active.entry(kind) {
            Entry::Occupied(_) => return Err(JobError::AlreadyRunning(kind)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        self.runs.insert(
            id,
            RunRecord {
                status: JobStatus {
                    id,
                    kind,
                    trigger,
                    state: JobState::Running,
                    processed: 0,
                    failed: 0,
                    started_at: Utc::now(),
                    finished_at: None,
                    duration_ms: None,
                    error: None,
                },
                counters: Arc::new(PassCounters::default()),
            },
        );
        info!(%kind, %trigger, job_id = %id, "Job started");
        Ok((id, task))
    }

    async fn execute(&self, id: Uuid, task: Arc<dyn StudentTask>, cancel: &CancellationToken) {
        let kind = task.kind();
        let _slot = ActiveSlot {
            registry: self,
            kind,
            id,
        };
        let Some(counters) = self.runs.get(&id).map(|r| r.counters.clone()) else {
            return;
        };

        let result = run_pass(
            self.directory.as_ref(),
            task.as_ref(),
            self.pass,
            &counters,
            cancel,
        )
        .await;

        match result {
            Ok(summary) if summary.cancelled => self.finish(id, JobState::Cancelled, None),
            Ok(_) => self.finish(id, JobState::Completed, None),
            Err(e) => {
                error!(%kind, job_id = %id, error = %e, "Job failed");
                self.finish(id, JobState::Failed, Some(e.to_string()));
            }
        }
    }

    fn finish(&self, id: Uuid, state: JobState, error: Option<String>) {
        let Some(mut record) = self.runs.get_mut(&id) else {
            return;
        };
        let RunRecord { status, counters } = &mut *record;
        let finished_at = Utc::now();
        status.processed = counters.processed();
        status.failed = counters.failed();
        status.finished_at = Some(finished_at);
        status.duration_ms = Some(
            (finished_at - status.started_at)
                .num_milliseconds()
                .max(0) as u64,
        );
        status.state = state;
        status.error = error;
    }

    /// Drop the oldest finished runs beyond [`RETAINED_RUNS`].
    fn prune(&self) {
        let mut finished: Vec<(DateTime<Utc>, Uuid)> = self
            .runs
            .iter()
            .filter(|r| r.status.state != JobState::Running)
            .map(|r| (r.status.started_at, r.status.id))
            .collect();
        if finished.len() <= RETAINED_RUNS {
            return;
        }
        finished.sort();
        let excess = finished.len() - RETAINED_RUNS;
        for (_, id) in finished.into_iter().take(excess) {
            self.runs.remove(&id);
        }
        warn!(removed = excess, "Pruned old job records");
    }
}

//! Batch passes over the student directory and their scheduling.

pub mod pass;
pub mod registry;
pub mod scheduled;

use async_trait::async_trait;
use common::JobKind;

use crate::services::SyncError;
use crate::store::StudentRef;

pub use pass::{PassConfig, PassCounters, PassSummary, run_pass};
pub use registry::{JobError, JobRegistry, JobStatus};
pub use scheduled::ScheduledJob;

/// Per-student unit of work of one job kind.
#[async_trait]
pub trait StudentTask: Send + Sync {
    fn kind(&self) -> JobKind;

    async fn run(&self, student: &StudentRef) -> Result<(), SyncError>;
}

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{JobKind, JobTrigger};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::{JobError, JobRegistry};

enum Phase {
    Idle,
    Started(JoinHandle<()>),
    Stopped,
}

/// A recurring pass of one kind: first run after `first_delay`, then every
/// `interval`.
pub struct ScheduledJob {
    kind: JobKind,
    registry: Arc<JobRegistry>,
    first_delay: Duration,
    interval: Duration,
    cancel: CancellationToken,
    phase: Mutex<Phase>,
}

impl ScheduledJob {
    pub fn new(
        kind: JobKind,
        registry: Arc<JobRegistry>,
        first_delay: Duration,
        interval: Duration,
    ) -> Self {
        let cancel = registry.shutdown_token().child_token();
        Self {
            kind,
            registry,
            first_delay,
            interval,
            cancel,
            phase: Mutex::new(Phase::Idle),
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Spawn the timer loop. Fails if the job was started or stopped before.
    pub fn start(&self) -> Result<(), JobError> {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        if !matches!(*phase, Phase::Idle) {
            return Err(JobError::AlreadyStarted(self.kind));
        }

        info!(
            kind = %self.kind,
            first_delay_secs = self.first_delay.as_secs(),
            interval_secs = self.interval.as_secs(),
            "Scheduling job"
        );

        let handle = tokio::spawn(run_loop(
            self.kind,
            self.registry.clone(),
            self.first_delay,
            self.interval,
            self.cancel.clone(),
        ));
        *phase = Phase::Started(handle);
        Ok(())
    }

    /// Stop the timer and wait for an in-flight pass to wind down.
    ///
    /// Safe to call before `start` and more than once.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let previous = {
            let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *phase, Phase::Stopped)
        };

        if let Phase::Started(handle) = previous {
            if let Err(e) = handle.await {
                error!(kind = %self.kind, error = %e, "Scheduled job task panicked");
            }
            info!(kind = %self.kind, "Scheduled job stopped");
        }
    }
}

async fn run_loop(
    kind: JobKind,
    registry: Arc<JobRegistry>,
    first_delay: Duration,
    interval: Duration,
    cancel: CancellationToken,
) {
    // A zero period would make `interval_at` panic.
    let period = interval.max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval_at(Instant::now() + first_delay, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match registry.run(kind, JobTrigger::Scheduled, &cancel).await {
            Ok(status) => info!(
                %kind,
                job_id = %status.id,
                state = ?status.state,
                processed = status.processed,
                failed = status.failed,
                "Scheduled run finished"
            ),
            Err(JobError::AlreadyRunning(_)) => {
                warn!(%kind, "Previous run still in progress, skipping this tick");
            }
            Err(e) => {
                error!(%kind, error = %e, "Scheduled run could not start");
                break;
            }
        }
    }
}

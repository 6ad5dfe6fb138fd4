use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// In-process advisory locks keyed by internal student id.
///
/// Held for one student's fetch-and-write so an interactive trigger and a
/// background pass never interleave writes for the same student.
#[derive(Default)]
pub struct StudentLocks {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl StudentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, student_id: i32) -> OwnedMutexGuard<()> {
        // Clone out of the map before awaiting so no shard guard is held.
        let lock = self.locks.entry(student_id).or_default().clone();
        lock.lock_owned().await
    }
}

//! Shared access to the job table.
//!
//! The main flow and the reconciler both reach the table through
//! [`JobManager::lock`]. The reconciler takes the guard *before* it asks the
//! OS for child status, so while the main flow holds a guard no child is
//! reaped: that is the deferred-delivery window around spawn → register and
//! around every multi-step command update.

use std::ops::{Deref, DerefMut};

use jobsh_types::JobInfo;
use tokio::sync::{watch, Mutex, MutexGuard};

use super::table::JobTable;

/// Owner of the single job table.
pub struct JobManager {
    table: Mutex<JobTable>,
    /// Bumped whenever a guard that mutated the table is released.
    revision: watch::Sender<u64>,
}

impl JobManager {
    /// Create a manager around an empty table of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            table: Mutex::new(JobTable::new(capacity)),
            revision,
        }
    }

    /// Take exclusive access to the table.
    ///
    /// Child reaping is deferred until the guard is dropped. Keep the guard
    /// short and never hold it across a wait on a job.
    pub async fn lock(&self) -> JobsGuard<'_> {
        JobsGuard {
            table: self.table.lock().await,
            revision: &self.revision,
            dirty: false,
        }
    }

    /// Receive a notification after every table change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current table revision.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Snapshots of every live job in slot order.
    pub async fn list(&self) -> Vec<JobInfo> {
        self.lock().await.list()
    }

    /// Snapshot of the job holding `pid`.
    pub async fn get(&self, pid: u32) -> Option<JobInfo> {
        self.lock().await.find_by_pid(pid).map(|job| job.info())
    }

    /// Process id of the foreground job, if any.
    pub async fn foreground_pid(&self) -> Option<u32> {
        self.lock().await.foreground_pid()
    }

    /// Number of live jobs.
    pub async fn live_count(&self) -> usize {
        self.lock().await.live_count()
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_JOBS)
    }
}

/// Exclusive access to the job table.
///
/// Mutable access marks the guard dirty; dropping a dirty guard wakes
/// everyone subscribed to table changes.
pub struct JobsGuard<'a> {
    table: MutexGuard<'a, JobTable>,
    revision: &'a watch::Sender<u64>,
    dirty: bool,
}

impl Deref for JobsGuard<'_> {
    type Target = JobTable;

    fn deref(&self) -> &JobTable {
        &self.table
    }
}

impl DerefMut for JobsGuard<'_> {
    fn deref_mut(&mut self) -> &mut JobTable {
        self.dirty = true;
        &mut self.table
    }
}

impl Drop for JobsGuard<'_> {
    fn drop(&mut self) {
        if self.dirty {
            self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
        }
    }
}

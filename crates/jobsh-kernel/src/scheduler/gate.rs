//! Waiting for the foreground job to leave the foreground.

use std::sync::Arc;
use std::time::Duration;

use jobsh_types::JobState;

use super::manager::JobManager;

/// How a foreground wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateExit {
    /// The job is no longer in the table (reaped, or never registered).
    Gone,
    /// The job is still tracked but left the foreground.
    Left(JobState),
}

/// Blocks the main flow until a job stops being Foreground.
///
/// The gate never holds the table lock while it waits, so the reconciler can
/// always get in to apply the change the gate is waiting for.
#[derive(Clone)]
pub struct ForegroundGate {
    jobs: Arc<JobManager>,
    poll_interval: Duration,
}

impl ForegroundGate {
    pub fn new(jobs: Arc<JobManager>, poll_interval: Duration) -> Self {
        Self { jobs, poll_interval }
    }

    /// Wait until the job holding `pid` is absent or not Foreground.
    ///
    /// Returns immediately if that is already the case.
    pub async fn wait_for_foreground_exit(&self, pid: u32) -> GateExit {
        // Subscribe before the first check so a change in between is not lost.
        let mut changes = self.jobs.subscribe();

        loop {
            match self.jobs.get(pid).await {
                None => return GateExit::Gone,
                Some(job) if job.state != JobState::Foreground => return GateExit::Left(job.state),
                Some(_) => {}
            }

            match tokio::time::timeout(self.poll_interval, changes.changed()).await {
                Ok(Ok(())) | Err(_) => continue,
                // Sender dropped: the manager is gone, nothing left to wait for.
                Ok(Err(_)) => return GateExit::Gone,
            }
        }
    }
}

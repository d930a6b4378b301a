//! Child status reconciliation.
//!
//! On every SIGCHLD the reconciler takes the job table guard and drains all
//! pending child status changes. Several children may change state before one
//! notification is delivered, so one run always reaps until nothing is left.

use std::sync::Arc;

use jobsh_types::JobState;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;

use super::manager::JobManager;
use crate::error::JobResult;
use crate::process::{ChildChange, ChildEvent, ProcessControl};
use crate::report::Reporter;

/// What the reconciler did with one reaped child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Exited normally; slot cleared.
    Exited { pid: u32, code: i32 },
    /// Killed by a signal; reported and slot cleared.
    Terminated { pid: u32, signal: i32 },
    /// Stopped by a signal; reported and marked Stopped.
    Stopped { pid: u32, signal: i32 },
    /// No job held this pid.
    Untracked { pid: u32 },
}

/// Applies child status changes to the job table.
#[derive(Clone)]
pub struct Reconciler {
    jobs: Arc<JobManager>,
    processes: Arc<dyn ProcessControl>,
    reporter: Arc<dyn Reporter>,
}

impl Reconciler {
    pub fn new(jobs: Arc<JobManager>, processes: Arc<dyn ProcessControl>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            jobs,
            processes,
            reporter,
        }
    }

    /// Reap every pending child and update the table.
    ///
    /// Never blocks on a child. A reap error ends this run early; children
    /// left behind are picked up by the next one.
    pub async fn reconcile(&self) -> Vec<Applied> {
        let mut jobs = self.jobs.lock().await;
        let mut applied = Vec::new();

        loop {
            let event = match self.processes.reap_next() {
                Ok(Some(event)) => event,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("reconcile: {}", e);
                    break;
                }
            };

            let ChildEvent { pid, change } = event;
            let Some(job) = jobs.find_by_pid(pid) else {
                // Registration had not happened yet, or the job was already
                // cleared by quit.
                tracing::trace!(pid, ?change, "reaped untracked child");
                applied.push(Applied::Untracked { pid });
                continue;
            };
            let id = job.id;

            match change {
                ChildChange::Signaled(sig) => {
                    self.reporter
                        .report(&format!("Job [{}] ({}) terminated by signal {}", id, pid, sig));
                    jobs.remove(pid);
                    applied.push(Applied::Terminated { pid, signal: sig });
                }
                ChildChange::Stopped(sig) => {
                    if let Err(e) = jobs.set_state(pid, JobState::Stopped) {
                        tracing::warn!(pid, "failed to mark job stopped: {}", e);
                    }
                    self.reporter
                        .report(&format!("Job [{}] ({}) stopped by signal {}", id, pid, sig));
                    applied.push(Applied::Stopped { pid, signal: sig });
                }
                ChildChange::Exited(code) => {
                    tracing::debug!(job = %id, pid, code, "job exited");
                    jobs.remove(pid);
                    applied.push(Applied::Exited { pid, code });
                }
            }
        }

        applied
    }

    /// Run [`reconcile`](Self::reconcile) on every SIGCHLD, forever.
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen(self) -> JobResult<JoinHandle<()>> {
        let mut sigchld = signal(SignalKind::child()).map_err(crate::error::JobError::Listen)?;
        Ok(tokio::spawn(async move {
            // A child may have changed state before the handler existed.
            self.reconcile().await;
            while sigchld.recv().await.is_some() {
                let applied = self.reconcile().await;
                tracing::trace!(count = applied.len(), "reconciled");
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::FakeProcesses;
    use crate::process::Signal;
    use crate::report::BufferReporter;

    fn setup() -> (Arc<JobManager>, Arc<FakeProcesses>, BufferReporter, Reconciler) {
        let jobs = Arc::new(JobManager::new(16));
        let procs = Arc::new(FakeProcesses::new());
        let out = BufferReporter::new();
        let rec = Reconciler::new(jobs.clone(), procs.clone(), Arc::new(out.clone()));
        (jobs, procs, out, rec)
    }

    #[tokio::test]
    async fn drains_every_pending_event() {
        let (jobs, procs, out, rec) = setup();
        {
            let mut t = jobs.lock().await;
            t.insert(10, JobState::Background, "a &").unwrap();
            t.insert(11, JobState::Background, "b &").unwrap();
            t.insert(12, JobState::Background, "c &").unwrap();
        }
        procs.push_event(ChildEvent::exited(10, 0));
        procs.push_event(ChildEvent::exited(11, 1));
        procs.push_event(ChildEvent::exited(12, 0));

        let applied = rec.reconcile().await;
        assert_eq!(applied.len(), 3);
        assert_eq!(procs.pending_events(), 0);
        assert_eq!(jobs.live_count().await, 0);
        // Normal exits are silent
        assert!(out.lines().is_empty());
    }

    #[tokio::test]
    async fn signal_termination_reports_and_removes() {
        let (jobs, procs, out, rec) = setup();
        jobs.lock().await.insert(20, JobState::Foreground, "sleep 100").unwrap();
        procs.push_event(ChildEvent::signaled(20, Signal::SIGINT));

        let applied = rec.reconcile().await;
        assert_eq!(applied, vec![Applied::Terminated { pid: 20, signal: 2 }]);
        assert_eq!(out.lines(), vec!["Job [1] (20) terminated by signal 2"]);
        assert!(jobs.get(20).await.is_none());
    }

    #[tokio::test]
    async fn stop_marks_stopped_and_keeps_job() {
        let (jobs, procs, out, rec) = setup();
        jobs.lock().await.insert(30, JobState::Foreground, "sleep 100").unwrap();
        procs.push_event(ChildEvent::stopped(30, Signal::SIGTSTP));

        rec.reconcile().await;
        let job = jobs.get(30).await.expect("job kept");
        assert_eq!(job.state, JobState::Stopped);
        assert_eq!(jobs.foreground_pid().await, None);
        assert_eq!(
            out.lines(),
            vec![format!("Job [1] (30) stopped by signal {}", Signal::SIGTSTP as i32)]
        );
    }

    #[tokio::test]
    async fn untracked_pid_is_ignored() {
        let (jobs, procs, out, rec) = setup();
        procs.push_event(ChildEvent::signaled(999, Signal::SIGTERM));

        let applied = rec.reconcile().await;
        assert_eq!(applied, vec![Applied::Untracked { pid: 999 }]);
        assert_eq!(jobs.live_count().await, 0);
        assert!(out.lines().is_empty());
    }

    #[tokio::test]
    async fn reaping_waits_for_registration() {
        let (jobs, procs, _out, rec) = setup();

        // Child exits before the main flow has registered it.
        let guard = jobs.lock().await;
        procs.push_event(ChildEvent::exited(40, 0));

        let handle = tokio::spawn({
            let rec = rec.clone();
            async move { rec.reconcile().await }
        });
        tokio::task::yield_now().await;
        assert_eq!(procs.pending_events(), 1, "reaped while registration was in progress");

        let mut guard = guard;
        guard.insert(40, JobState::Background, "true &").unwrap();
        drop(guard);

        let applied = handle.await.unwrap();
        assert_eq!(applied, vec![Applied::Exited { pid: 40, code: 0 }]);
        assert_eq!(jobs.live_count().await, 0);
    }
}

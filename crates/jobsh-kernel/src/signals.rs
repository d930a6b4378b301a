//! Keyboard-generated interrupt and suspend requests.
//!
//! Jobs run in their own process groups, so ctrl-c and ctrl-z reach only the
//! shell. The forwarder passes the same signal on to the foreground job's
//! group. It never updates the table itself; the resulting stop or
//! termination comes back through the reconciler.

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;

use crate::error::{JobError, JobResult};
use crate::process::{ProcessControl, Signal};
use crate::scheduler::JobManager;

/// Forwards SIGINT and SIGTSTP to the foreground job.
#[derive(Clone)]
pub struct SignalForwarder {
    jobs: Arc<JobManager>,
    processes: Arc<dyn ProcessControl>,
}

impl SignalForwarder {
    pub fn new(jobs: Arc<JobManager>, processes: Arc<dyn ProcessControl>) -> Self {
        Self { jobs, processes }
    }

    /// Send `signal` to the foreground job's group.
    ///
    /// Returns the group signalled, or `None` when nothing is in the
    /// foreground.
    pub async fn forward(&self, signal: Signal) -> Option<u32> {
        let pgid = self.jobs.foreground_pid().await?;
        match self.processes.signal_group(pgid, signal) {
            Ok(()) => {
                tracing::debug!(pgid, ?signal, "forwarded to foreground job");
                Some(pgid)
            }
            Err(e) => {
                // The job may have exited between the lookup and the kill.
                tracing::debug!("forward {:?}: {}", signal, e);
                None
            }
        }
    }

    /// Listen for SIGINT and SIGTSTP and forward them, forever.
    ///
    /// Installing the listeners also keeps the shell itself from being
    /// interrupted or suspended. Must be called from within a tokio runtime.
    pub fn listen(self) -> JobResult<JoinHandle<()>> {
        let mut interrupt = signal(SignalKind::interrupt()).map_err(JobError::Listen)?;
        let mut suspend = signal(SignalKind::from_raw(Signal::SIGTSTP as i32)).map_err(JobError::Listen)?;

        Ok(tokio::spawn(async move {
            loop {
                let sig = tokio::select! {
                    Some(()) = interrupt.recv() => Signal::SIGINT,
                    Some(()) = suspend.recv() => Signal::SIGTSTP,
                    else => break,
                };
                self.forward(sig).await;
            }
        }))
    }
}

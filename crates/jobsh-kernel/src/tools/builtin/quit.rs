//! quit: Terminate every job and end the shell.

use async_trait::async_trait;
use jobsh_types::{ExecResult, JobState};

use crate::process::Signal;
use crate::tools::{Builtin, ExecContext};

/// Quit builtin.
pub struct Quit;

#[async_trait]
impl Builtin for Quit {
    fn name(&self) -> &str {
        "quit"
    }

    fn usage(&self) -> &str {
        "quit"
    }

    async fn execute(&self, _args: &[String], ctx: &mut ExecContext) -> ExecResult {
        let mut jobs = ctx.jobs.lock().await;
        for job in jobs.clear() {
            if let Err(e) = ctx.processes.signal_group(job.pid, Signal::SIGTERM) {
                tracing::warn!(pid = job.pid, "quit: {e}");
                continue;
            }
            // A stopped group only acts on SIGTERM once continued.
            if job.state == JobState::Stopped
                && let Err(e) = ctx.processes.signal_group(job.pid, Signal::SIGCONT)
            {
                tracing::warn!(pid = job.pid, "quit: {e}");
            }
        }
        drop(jobs);

        ctx.request_exit(0);
        ExecResult::default()
    }
}

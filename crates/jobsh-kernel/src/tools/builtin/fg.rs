//! fg: Continue a job in the foreground and wait for it.

use async_trait::async_trait;
use jobsh_types::{ExecResult, JobState};

use super::{error_result, resolve};
use crate::parser::Target;
use crate::process::Signal;
use crate::tools::{Builtin, ExecContext};

/// Fg builtin: `fg PID` or `fg %JID`.
pub struct Fg;

#[async_trait]
impl Builtin for Fg {
    fn name(&self) -> &str {
        "fg"
    }

    fn usage(&self) -> &str {
        "fg <pid>|%<jobid>"
    }

    async fn execute(&self, args: &[String], ctx: &mut ExecContext) -> ExecResult {
        let target = match Target::parse("fg", args.first().map(String::as_str)) {
            Ok(target) => target,
            Err(e) => return error_result(e),
        };

        let pid = {
            let mut jobs = ctx.jobs.lock().await;
            let job = match resolve(&jobs, target) {
                Ok(job) => job,
                Err(e) => return error_result(e),
            };

            // An already-foreground job just gets waited on again.
            if job.state != JobState::Foreground {
                if let Err(e) = ctx.processes.signal_group(job.pid, Signal::SIGCONT) {
                    return error_result(e);
                }
                if let Err(e) = jobs.set_state(job.pid, JobState::Foreground) {
                    return error_result(e);
                }
                tracing::debug!(jid = %job.id, pid = job.pid, "continued in foreground");
            }
            job.pid
        };

        let exit = ctx.gate.wait_for_foreground_exit(pid).await;
        tracing::debug!(pid, ?exit, "foreground wait finished");
        ExecResult::default()
    }
}

//! bg: Continue a job in the background.

use async_trait::async_trait;
use jobsh_types::{ExecResult, JobState};

use super::{error_result, resolve};
use crate::parser::Target;
use crate::process::Signal;
use crate::tools::{Builtin, ExecContext};

/// Bg builtin: `bg PID` or `bg %JID`.
pub struct Bg;

#[async_trait]
impl Builtin for Bg {
    fn name(&self) -> &str {
        "bg"
    }

    fn usage(&self) -> &str {
        "bg <pid>|%<jobid>"
    }

    async fn execute(&self, args: &[String], ctx: &mut ExecContext) -> ExecResult {
        let target = match Target::parse("bg", args.first().map(String::as_str)) {
            Ok(target) => target,
            Err(e) => return error_result(e),
        };

        let mut jobs = ctx.jobs.lock().await;
        let job = match resolve(&jobs, target) {
            Ok(job) => job,
            Err(e) => return error_result(e),
        };

        if job.state.is_resumable() {
            if let Err(e) = ctx.processes.signal_group(job.pid, Signal::SIGCONT) {
                return error_result(e);
            }
            if let Err(e) = jobs.set_state(job.pid, JobState::Background) {
                return error_result(e);
            }
            tracing::debug!(jid = %job.id, pid = job.pid, "continued in background");
        }

        ExecResult::success(format!("[{}] ({}) {}\n", job.id, job.pid, job.command))
    }
}

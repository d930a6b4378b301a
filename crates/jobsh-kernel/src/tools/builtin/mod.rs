//! The job-control builtins.

mod bg;
mod fg;
mod jobs;
mod quit;

use jobsh_types::ExecResult;

use super::BuiltinRegistry;
use crate::error::{JobError, JobResult};
use crate::parser::Target;
use crate::scheduler::{Job, JobTable};

/// Register every builtin with the registry.
pub fn register_builtins(registry: &mut BuiltinRegistry) {
    registry.register(bg::Bg);
    registry.register(fg::Fg);
    registry.register(jobs::Jobs);
    registry.register(quit::Quit);
}

/// Find the job an `fg`/`bg` target names.
fn resolve(table: &JobTable, target: Target) -> JobResult<Job> {
    match target {
        Target::Pid(pid) => table.find_by_pid(pid).cloned().ok_or(JobError::NoSuchProcess(pid)),
        Target::Job(id) => table.find_by_jid(id).cloned().ok_or(JobError::NoSuchJob(id)),
    }
}

fn error_result(e: JobError) -> ExecResult {
    if !e.is_user_input() {
        tracing::warn!("{}", e);
    }
    ExecResult::failure(1, format!("{e}\n"))
}

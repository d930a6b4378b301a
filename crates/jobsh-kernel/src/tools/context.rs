//! Execution context for builtins.

use std::sync::Arc;

use crate::process::ProcessControl;
use crate::scheduler::{ForegroundGate, JobManager};

/// Everything a builtin may touch.
pub struct ExecContext {
    /// The shared job table.
    pub jobs: Arc<JobManager>,
    /// Signal delivery to job process groups.
    pub processes: Arc<dyn ProcessControl>,
    /// Wait for a job to leave the foreground.
    pub gate: ForegroundGate,
    /// Set by `quit`; the kernel turns it into an exit request.
    exit_code: Option<i32>,
}

impl ExecContext {
    pub fn new(jobs: Arc<JobManager>, processes: Arc<dyn ProcessControl>, gate: ForegroundGate) -> Self {
        Self {
            jobs,
            processes,
            gate,
            exit_code: None,
        }
    }

    /// Ask the shell to exit with `code` once the current builtin returns.
    pub fn request_exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }

    /// Take a pending exit request.
    pub fn take_exit(&mut self) -> Option<i32> {
        self.exit_code.take()
    }
}

//! Real process control on Unix.

use std::os::unix::process::CommandExt;
use std::process::Command;

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use super::{ChildEvent, ProcessControl, SpawnRequest};
use crate::error::{JobError, JobResult};

/// Process control backed by `fork`/`exec`, `killpg` and `waitpid`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsProcesses;

impl OsProcesses {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessControl for OsProcesses {
    fn spawn(&self, request: &SpawnRequest) -> JobResult<u32> {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args);

        // New process group: terminal-generated signals reach the shell only.
        cmd.process_group(0);

        // The Child handle is dropped without waiting. Its status is collected
        // by the reconciler through waitpid(-1).
        let child = cmd
            .spawn()
            .map_err(|e| JobError::from_spawn(&request.program, e))?;

        let pid = child.id();
        tracing::debug!(pid, program = %request.program, "spawned");
        Ok(pid)
    }

    fn signal_group(&self, pgid: u32, signal: Signal) -> JobResult<()> {
        tracing::trace!(pgid, ?signal, "killpg");
        killpg(Pid::from_raw(pgid as i32), signal).map_err(|source| JobError::Signal { pgid, source })
    }

    fn reap_next(&self) -> JobResult<Option<ChildEvent>> {
        let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED;
        loop {
            match waitpid(Pid::from_raw(-1), Some(flags)) {
                Ok(WaitStatus::Exited(pid, code)) => {
                    return Ok(Some(ChildEvent::exited(pid.as_raw() as u32, code)));
                }
                Ok(WaitStatus::Signaled(pid, sig, _core)) => {
                    return Ok(Some(ChildEvent::signaled(pid.as_raw() as u32, sig)));
                }
                Ok(WaitStatus::Stopped(pid, sig)) => {
                    return Ok(Some(ChildEvent::stopped(pid.as_raw() as u32, sig)));
                }
                Ok(WaitStatus::StillAlive) => return Ok(None),
                // Continued and ptrace events carry nothing for the job table
                Ok(_) => continue,
                Err(Errno::ECHILD) => return Ok(None),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(JobError::Reap(e)),
            }
        }
    }
}

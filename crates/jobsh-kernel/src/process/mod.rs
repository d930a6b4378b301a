//! The seam between the shell and the operating system's process model.
//!
//! The job-control core never forks, signals, or reaps directly. It goes
//! through [`ProcessControl`], which has one real implementation
//! ([`OsProcesses`]) and one scripted implementation for tests
//! ([`testing::FakeProcesses`]).

mod os;
pub mod testing;

pub use nix::sys::signal::Signal;
pub use os::OsProcesses;

use crate::error::JobResult;

/// Request to launch a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Program path or name (looked up in `PATH` when it has no `/`).
    pub program: String,
    /// Arguments after the program name. The environment is inherited.
    pub args: Vec<String>,
}

impl SpawnRequest {
    /// Build a request from an argument vector (`argv[0]` is the program).
    ///
    /// Returns `None` for an empty vector.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

/// How a child's run state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildChange {
    /// Exited normally with the given status.
    Exited(i32),
    /// Terminated by an uncaught signal.
    Signaled(i32),
    /// Suspended by a stop signal.
    Stopped(i32),
}

/// One collected child status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildEvent {
    /// Process id of the child.
    pub pid: u32,
    /// What happened to it.
    pub change: ChildChange,
}

impl ChildEvent {
    pub fn exited(pid: u32, code: i32) -> Self {
        Self { pid, change: ChildChange::Exited(code) }
    }

    pub fn signaled(pid: u32, signal: Signal) -> Self {
        Self { pid, change: ChildChange::Signaled(signal as i32) }
    }

    pub fn stopped(pid: u32, signal: Signal) -> Self {
        Self { pid, change: ChildChange::Stopped(signal as i32) }
    }
}

/// Operating-system primitives the job-control core depends on.
pub trait ProcessControl: Send + Sync {
    /// Launch a program in a new process group of its own.
    ///
    /// Returns the child's pid, which is also its process group id.
    fn spawn(&self, request: &SpawnRequest) -> JobResult<u32>;

    /// Send `signal` to every process in group `pgid`.
    fn signal_group(&self, pgid: u32, signal: Signal) -> JobResult<()>;

    /// Collect the next terminated or stopped child without blocking.
    ///
    /// Returns `Ok(None)` when no child has a pending status change.
    fn reap_next(&self) -> JobResult<Option<ChildEvent>>;
}

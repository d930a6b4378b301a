//! jobsh-kernel: job control for a small Unix shell.
//!
//! This crate provides:
//!
//! - **Job table**: fixed-capacity registry of launched process groups
//! - **Reconciler**: applies SIGCHLD-reported status changes to the table
//! - **Foreground gate**: blocks the read loop while a job holds the foreground
//! - **Builtins**: `quit`, `jobs`, `fg`, `bg`
//! - **Kernel**: parses a line and either runs a builtin or launches a job

pub mod config;
pub mod error;
pub mod kernel;
pub mod parser;
pub mod process;
pub mod report;
pub mod scheduler;
pub mod signals;
pub mod tools;

pub use config::ShellConfig;
pub use error::{JobError, JobResult};
pub use kernel::{Kernel, Listeners, Outcome};
pub use process::{OsProcesses, ProcessControl};
pub use report::{BufferReporter, Reporter, StdoutReporter};
pub use scheduler::{ForegroundGate, GateExit, JobManager};

pub use jobsh_types::{ExecResult, JobId, JobInfo, JobState};

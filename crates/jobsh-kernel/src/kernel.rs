//! The Kernel: dispatch of one command line.
//!
//! The Kernel owns the pieces of the shell that outlive a single line:
//! - Job table (behind [`JobManager`])
//! - Process control (real or scripted)
//! - Builtin registry
//! - Notice sink for asynchronous reports
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                          Kernel                          │
//! │  ┌─────────────────┐  ┌──────────────┐  ┌─────────────┐  │
//! │  │ BuiltinRegistry │  │  JobManager  │  │  Reporter   │  │
//! │  │ fg bg jobs quit │  │  (JobTable)  │  │  (notices)  │  │
//! │  └─────────────────┘  └──────────────┘  └─────────────┘  │
//! │  ┌──────────────────────────┐  ┌──────────────────────┐  │
//! │  │ ProcessControl (spawn,   │  │ ForegroundGate       │  │
//! │  │ killpg, waitpid)         │  │                      │  │
//! │  └──────────────────────────┘  └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//!        ▲                                   ▲
//!        │ SIGCHLD                           │ SIGINT / SIGTSTP
//!   Reconciler task                    SignalForwarder task
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use jobsh_types::{ExecResult, JobState};
use tokio::task::JoinHandle;

use crate::config::ShellConfig;
use crate::error::{JobError, JobResult};
use crate::parser::{parse_line, ParsedLine};
use crate::process::{OsProcesses, ProcessControl, Signal, SpawnRequest};
use crate::report::{Reporter, StdoutReporter};
use crate::scheduler::{Applied, ForegroundGate, JobManager, Reconciler};
use crate::signals::SignalForwarder;
use crate::tools::{register_builtins, BuiltinRegistry, ExecContext};

/// What the read loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the result and read the next line.
    Continue(ExecResult),
    /// End the shell with this status.
    Exit(i32),
}

/// Executes command lines against one job table.
pub struct Kernel {
    config: ShellConfig,
    jobs: Arc<JobManager>,
    processes: Arc<dyn ProcessControl>,
    reporter: Arc<dyn Reporter>,
    gate: ForegroundGate,
    builtins: BuiltinRegistry,
}

impl Kernel {
    /// Create a kernel that runs real processes and prints notices to stdout.
    pub fn new(config: ShellConfig) -> Self {
        Self::with_processes(config, Arc::new(OsProcesses::new()), Arc::new(StdoutReporter))
    }

    /// Create a kernel over the given process control and notice sink.
    pub fn with_processes(config: ShellConfig, processes: Arc<dyn ProcessControl>, reporter: Arc<dyn Reporter>) -> Self {
        let jobs = Arc::new(JobManager::new(config.max_jobs));
        let gate = ForegroundGate::new(jobs.clone(), config.poll_interval);
        let mut builtins = BuiltinRegistry::new();
        register_builtins(&mut builtins);

        Self {
            config,
            jobs,
            processes,
            reporter,
            gate,
            builtins,
        }
    }

    /// The configuration this kernel was built with.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Get the job manager.
    pub fn jobs(&self) -> Arc<JobManager> {
        self.jobs.clone()
    }

    /// A reconciler over this kernel's table.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.jobs.clone(), self.processes.clone(), self.reporter.clone())
    }

    /// Reap and apply pending child changes once.
    pub async fn reconcile(&self) -> Vec<Applied> {
        self.reconciler().reconcile().await
    }

    /// Start the SIGCHLD reconciler and the SIGINT/SIGTSTP forwarder.
    ///
    /// Both stop when the returned handle is dropped.
    pub fn start_listeners(&self) -> Result<Listeners> {
        let reconciler = self
            .reconciler()
            .listen()
            .context("starting child status listener")?;
        let forwarder = SignalForwarder::new(self.jobs.clone(), self.processes.clone())
            .listen()
            .context("starting interrupt forwarder")?;
        Ok(Listeners {
            tasks: vec![reconciler, forwarder],
        })
    }

    /// Execute one command line.
    ///
    /// Command-level failures (unknown job, missing program, full table)
    /// come back as a failed [`ExecResult`]. `Err` is reserved for failures
    /// of the shell itself, such as being unable to signal a process group.
    #[tracing::instrument(level = "info", skip(self, line), fields(line = line.trim_end()))]
    pub async fn execute(&self, line: &str) -> Result<Outcome> {
        let Some(parsed) = parse_line(line) else {
            return Ok(Outcome::Continue(ExecResult::default()));
        };

        if let Some(builtin) = self.builtins.get(&parsed.argv[0]) {
            let mut ctx = ExecContext::new(self.jobs.clone(), self.processes.clone(), self.gate.clone());
            let result = builtin.execute(&parsed.argv[1..], &mut ctx).await;
            return Ok(match ctx.take_exit() {
                Some(code) => Outcome::Exit(code),
                None => Outcome::Continue(result),
            });
        }

        match self.launch(&parsed).await {
            Ok(result) => Ok(Outcome::Continue(result)),
            Err(e @ (JobError::TableFull | JobError::CommandNotFound(_) | JobError::Spawn { .. })) => {
                tracing::debug!("launch refused: {}", e);
                Ok(Outcome::Continue(ExecResult::failure(1, format!("{e}\n"))))
            }
            Err(e) => Err(e).with_context(|| format!("running {}", parsed.argv[0])),
        }
    }

    /// Start an external program as a new job.
    #[tracing::instrument(level = "debug", skip(self, parsed), fields(program = %parsed.argv[0], background = parsed.background))]
    async fn launch(&self, parsed: &ParsedLine) -> JobResult<ExecResult> {
        let Some(request) = SpawnRequest::from_argv(&parsed.argv) else {
            return Ok(ExecResult::default());
        };
        let state = if parsed.background {
            JobState::Background
        } else {
            JobState::Foreground
        };

        let (id, pid) = {
            // Hold the table from before the spawn until the job is registered,
            // so the reconciler cannot reap the child first.
            let mut jobs = self.jobs.lock().await;
            if jobs.is_full() {
                return Err(JobError::TableFull);
            }

            let pid = self.processes.spawn(&request)?;
            let id = match jobs.insert(pid, state, parsed.cmdline.as_str()) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(pid, "could not register job: {}", e);
                    self.processes.signal_group(pid, Signal::SIGKILL)?;
                    return Err(e);
                }
            };
            if self.config.verbose {
                self.reporter.report(&format!("Added job [{id}] {pid} {}", parsed.cmdline));
            }
            (id, pid)
        };
        tracing::debug!(jid = %id, pid, "job started");

        if parsed.background {
            return Ok(ExecResult::success(format!("[{id}] {pid} {}\n", parsed.cmdline)));
        }

        let exit = self.gate.wait_for_foreground_exit(pid).await;
        tracing::debug!(jid = %id, pid, ?exit, "foreground wait finished");
        Ok(ExecResult::default())
    }
}

/// Running signal listeners. Dropping this stops them.
pub struct Listeners {
    tasks: Vec<JoinHandle<()>>,
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

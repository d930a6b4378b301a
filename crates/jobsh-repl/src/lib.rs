//! jobsh REPL: the read/eval loop around the job-control kernel.
//!
//! The loop reads one line at a time, hands it to the [`Kernel`], prints what
//! comes back, and ends on `quit` or end of input. Job notices from the
//! reconciler print on their own whenever a child changes state, including
//! while the loop sits at the prompt.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::runtime::Runtime;
use tokio::signal::unix::{signal, SignalKind};

use jobsh_kernel::{ExecResult, Kernel, Listeners, Outcome, ShellConfig};

/// Printed when the shell is told to quit with SIGQUIT.
pub const SIGQUIT_NOTICE: &str = "Terminating after receipt of SIGQUIT signal";

/// What the loop does after one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineResult {
    /// Print this and read on.
    Continue(ExecResult),
    /// End the shell with this status.
    Exit(i32),
}

/// REPL state: the kernel plus the runtime it runs on.
pub struct Repl {
    kernel: Kernel,
    _listeners: Option<Listeners>,
    runtime: Runtime,
}

impl Repl {
    /// Create a REPL that launches real processes and listens for signals.
    pub fn new(config: ShellConfig) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let kernel = Kernel::new(config);

        let listeners = {
            let _enter = runtime.enter();
            spawn_quit_listener().context("Failed to listen for SIGQUIT")?;
            kernel.start_listeners()?
        };

        Ok(Self {
            kernel,
            runtime,
            _listeners: Some(listeners),
        })
    }

    /// Wrap an existing kernel. No signal listeners are started.
    pub fn with_kernel(kernel: Kernel) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        Ok(Self {
            kernel,
            runtime,
            _listeners: None,
        })
    }

    /// The kernel this REPL drives.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Evaluate one line. Blocks while a foreground job runs.
    pub fn process_line(&mut self, line: &str) -> Result<LineResult> {
        match self.runtime.block_on(self.kernel.execute(line))? {
            Outcome::Continue(result) => Ok(LineResult::Continue(result)),
            Outcome::Exit(code) => Ok(LineResult::Exit(code)),
        }
    }
}

/// Print the notice and exit with status 1 on SIGQUIT.
///
/// Must be called from within a tokio runtime.
fn spawn_quit_listener() -> std::io::Result<()> {
    let mut quit = signal(SignalKind::quit())?;
    tokio::spawn(async move {
        if quit.recv().await.is_some() {
            println!("{SIGQUIT_NOTICE}");
            std::process::exit(1);
        }
    });
    Ok(())
}

fn print_result(result: &ExecResult) {
    if !result.out.is_empty() {
        print!("{}", result.out);
    }
    if !result.err.is_empty() {
        eprint!("{}", result.err);
    }
}

fn history_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.data_dir().join("jobsh").join("history.txt"))
}

/// Save REPL history to disk.
fn save_history(rl: &mut Editor<(), DefaultHistory>, history_path: &Option<PathBuf>) {
    if let Some(path) = history_path {
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!("Failed to create history directory: {}", e);
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

/// Run the REPL until `quit` or end of input. Returns the exit status.
pub fn run(config: ShellConfig) -> Result<i32> {
    let prompt = if config.emit_prompt {
        config.prompt.clone()
    } else {
        String::new()
    };
    let history_path = if config.history && config.emit_prompt {
        history_path()
    } else {
        None
    };

    let mut rl: Editor<(), DefaultHistory> = Editor::new().context("Failed to create editor")?;
    if let Some(ref path) = history_path
        && let Err(e) = rl.load_history(path)
    {
        // No history file yet on first run.
        let is_not_found = matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound);
        if !is_not_found {
            tracing::warn!("Failed to load history: {}", e);
        }
    }

    let mut repl = Repl::new(config)?;

    let code = loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                if history_path.is_some()
                    && !line.trim().is_empty()
                    && let Err(e) = rl.add_history_entry(line.as_str())
                {
                    tracing::warn!("Failed to add history entry: {}", e);
                }

                match repl.process_line(&line) {
                    Ok(LineResult::Continue(result)) => print_result(&result),
                    Ok(LineResult::Exit(code)) => break code,
                    Err(e) => eprintln!("Error: {e:#}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break 0,
            Err(err) => {
                eprintln!("Error: {}", err);
                break 1;
            }
        }
    };

    save_history(&mut rl, &history_path);
    Ok(code)
}

//! Shell configuration.

use std::time::Duration;

/// Default number of job table slots.
pub const DEFAULT_MAX_JOBS: usize = 16;

/// Default interval at which the foreground wait re-checks the job table.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default prompt.
pub const DEFAULT_PROMPT: &str = "jobsh> ";

/// Configuration for a shell kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt printed before each line when `emit_prompt` is set.
    pub prompt: String,

    /// Whether the read loop prints a prompt.
    ///
    /// Turned off with `-p`, handy for driving the shell from a script.
    pub emit_prompt: bool,

    /// Print additional diagnostics such as `Added job ...` lines.
    pub verbose: bool,

    /// Capacity of the job table. Job ids are issued from `1..=max_jobs`.
    pub max_jobs: usize,

    /// Upper bound between two checks of the foreground job's state.
    ///
    /// The wait also wakes on every table change, so this only matters when a
    /// change notification is missed.
    pub poll_interval: Duration,

    /// Persist line history across sessions (interactive use only).
    pub history: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            emit_prompt: true,
            verbose: false,
            max_jobs: DEFAULT_MAX_JOBS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            history: true,
        }
    }
}

impl ShellConfig {
    /// Interactive defaults: prompt and history on.
    pub fn interactive() -> Self {
        Self::default()
    }

    /// Config for scripted use: no prompt, no history.
    pub fn batch() -> Self {
        Self {
            emit_prompt: false,
            history: false,
            ..Self::default()
        }
    }

    /// Config for tests: quiet, fast foreground polling.
    pub fn testing() -> Self {
        Self {
            emit_prompt: false,
            history: false,
            poll_interval: Duration::from_millis(20),
            ..Self::default()
        }
    }

    /// Set the prompt string.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Enable or disable the prompt.
    pub fn with_emit_prompt(mut self, emit: bool) -> Self {
        self.emit_prompt = emit;
        self
    }

    /// Enable or disable verbose diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the job table capacity. Zero is bumped to one.
    pub fn with_max_jobs(mut self, max_jobs: usize) -> Self {
        self.max_jobs = max_jobs.max(1);
        self
    }

    /// Set the foreground poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Enable or disable persistent history.
    pub fn with_history(mut self, history: bool) -> Self {
        self.history = history;
        self
    }
}

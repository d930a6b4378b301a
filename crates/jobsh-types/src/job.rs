//! Job identification and state types.

use serde::{Deserialize, Serialize};

/// Shell-local identifier for a tracked job.
///
/// Ids are issued from `1..=capacity` of the job table; `%N` on the command
/// line refers to `JobId(N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u32);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run state of a tracked job.
///
/// Transitions:
///
/// ```text
/// Foreground ──ctrl-z──▶ Stopped ──bg──▶ Background
///      ▲                    │                │
///      └────────fg──────────┴───────fg───────┘
/// ```
///
/// At most one job is `Foreground` at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    /// Slot has no meaningful state. Never held by a live job.
    Undefined,
    /// Owns the shell's attention; the main flow is waiting on it.
    Foreground,
    /// Running independently of the main flow.
    Background,
    /// Suspended by a stop signal.
    Stopped,
}

impl JobState {
    /// Label used by the `jobs` listing.
    pub fn label(&self) -> &'static str {
        match self {
            JobState::Undefined => "Undefined",
            JobState::Foreground => "Foreground",
            JobState::Background => "Running",
            JobState::Stopped => "Stopped",
        }
    }

    /// True for states that `fg`/`bg` may continue.
    pub fn is_resumable(&self) -> bool {
        matches!(self, JobState::Stopped | JobState::Background)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of a job for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    /// Job ID.
    pub id: JobId,
    /// OS process ID (also the process group ID).
    pub pid: u32,
    /// Current state.
    pub state: JobState,
    /// Command line the job was launched with.
    pub command: String,
}

impl std::fmt::Display for JobInfo {
    /// `[jid] (pid) Label cmdline`, the `jobs` line format.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ({}) {} {}", self.id, self.pid, self.state.label(), self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_listed_as_running() {
        assert_eq!(JobState::Background.to_string(), "Running");
        assert_eq!(JobState::Stopped.to_string(), "Stopped");
        assert_eq!(JobState::Foreground.to_string(), "Foreground");
    }

    #[test]
    fn only_stopped_and_background_resume() {
        assert!(JobState::Stopped.is_resumable());
        assert!(JobState::Background.is_resumable());
        assert!(!JobState::Foreground.is_resumable());
        assert!(!JobState::Undefined.is_resumable());
    }

    #[test]
    fn info_formats_as_jobs_line() {
        let info = JobInfo {
            id: JobId(2),
            pid: 4242,
            state: JobState::Stopped,
            command: "sleep 100".to_string(),
        };
        assert_eq!(info.to_string(), "[2] (4242) Stopped sleep 100");
    }
}

//! Error types for job control.
//!
//! Every variant is recoverable from the shell's point of view: the read loop
//! reports it and continues. Only `quit` and end of input end the shell.

use jobsh_types::JobId;
use thiserror::Error;

/// Result type for job-control operations.
pub type JobResult<T> = Result<T, JobError>;

/// Job-control errors.
#[derive(Debug, Error)]
pub enum JobError {
    /// Tried to register a pid below 1.
    #[error("invalid pid: {0}")]
    InvalidPid(u32),

    /// Tried to register a job without a real run state.
    #[error("invalid job state: {0}")]
    InvalidState(jobsh_types::JobState),

    /// Every slot of the job table is occupied.
    #[error("Tried to create too many jobs")]
    TableFull,

    /// A second job would have become Foreground.
    #[error("job {0} is already in the foreground")]
    ForegroundBusy(JobId),

    /// `%N` named a job id nobody holds.
    #[error("%{0}: No such job")]
    NoSuchJob(JobId),

    /// A bare pid named a process nobody tracks.
    #[error("({0}): No such process")]
    NoSuchProcess(u32),

    /// `fg`/`bg` without an argument.
    #[error("{0} command requires PID or %jobid argument")]
    MissingTarget(String),

    /// `fg`/`bg` argument is neither digits nor `%` digits.
    #[error("{0}: argument must be a PID or %jobid")]
    BadTarget(String),

    /// The program to launch does not exist.
    #[error("{0}: Command not found")]
    CommandNotFound(String),

    /// Launching the program failed for another reason.
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Delivering a signal to a process group failed.
    #[error("failed to signal process group {pgid}: {source}")]
    Signal {
        pgid: u32,
        #[source]
        source: nix::Error,
    },

    /// Installing a signal listener failed.
    #[error("failed to listen for signals: {0}")]
    Listen(#[source] std::io::Error),

    /// Collecting child status failed.
    #[error("waitpid failed: {0}")]
    Reap(#[source] nix::Error),
}

impl JobError {
    /// Map an I/O error from process launch to the user-facing variant.
    pub fn from_spawn(program: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => JobError::CommandNotFound(program.to_string()),
            _ => JobError::Spawn {
                program: program.to_string(),
                source,
            },
        }
    }

    /// True for errors caused by what the user typed.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            JobError::NoSuchJob(_)
                | JobError::NoSuchProcess(_)
                | JobError::MissingTarget(_)
                | JobError::BadTarget(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_match_shell_output() {
        assert_eq!(JobError::NoSuchJob(JobId(333)).to_string(), "%333: No such job");
        assert_eq!(JobError::NoSuchProcess(999999).to_string(), "(999999): No such process");
        assert_eq!(
            JobError::MissingTarget("fg".into()).to_string(),
            "fg command requires PID or %jobid argument"
        );
        assert_eq!(
            JobError::BadTarget("bg".into()).to_string(),
            "bg: argument must be a PID or %jobid"
        );
        assert_eq!(JobError::TableFull.to_string(), "Tried to create too many jobs");
    }

    #[test]
    fn missing_program_is_command_not_found() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = JobError::from_spawn("./nope", io);
        assert_eq!(err.to_string(), "./nope: Command not found");
    }

    #[test]
    fn other_spawn_errors_keep_the_cause() {
        let io = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err = JobError::from_spawn("/etc/passwd", io);
        assert!(matches!(err, JobError::Spawn { .. }));
        assert!(err.to_string().starts_with("/etc/passwd: "));
        assert!(!err.is_user_input());
    }
}

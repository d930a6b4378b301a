//! The job table: a fixed number of slots holding tracked processes.
//!
//! The table does no locking of its own. Callers reach it through
//! [`JobManager::lock`](super::JobManager::lock), which is also what keeps
//! the reconciler from reaping while a multi-step update is in progress.

use jobsh_types::{JobId, JobInfo, JobState};

use crate::error::{JobError, JobResult};

/// One tracked process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Job id, unique among live jobs.
    pub id: JobId,
    /// OS process id; also the job's process group id.
    pub pid: u32,
    /// Current run state. Never `Undefined` for a live job.
    pub state: JobState,
    /// Command line the job was launched with.
    pub command: String,
}

impl Job {
    /// Snapshot for display.
    pub fn info(&self) -> JobInfo {
        JobInfo {
            id: self.id,
            pid: self.pid,
            state: self.state,
            command: self.command.clone(),
        }
    }
}

/// Fixed-capacity registry of jobs, in slot order.
#[derive(Debug, Clone)]
pub struct JobTable {
    /// `None` is a cleared slot.
    slots: Vec<Option<Job>>,
    /// Next job id to try when allocating.
    next_id: u32,
}

impl JobTable {
    /// Create an empty table with `capacity` slots (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            next_id: 1,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live jobs.
    pub fn live_count(&self) -> usize {
        self.jobs().count()
    }

    /// True if no slot is free.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The id the next insert will start probing from.
    pub fn next_id(&self) -> JobId {
        JobId(self.next_id)
    }

    /// Register a process in the first free slot.
    ///
    /// Fails with `InvalidPid` for pid 0, `InvalidState` for `Undefined`,
    /// `ForegroundBusy` if another job already holds the foreground, and
    /// `TableFull` when every slot is taken.
    pub fn insert(&mut self, pid: u32, state: JobState, command: impl Into<String>) -> JobResult<JobId> {
        if pid < 1 {
            return Err(JobError::InvalidPid(pid));
        }
        if state == JobState::Undefined {
            return Err(JobError::InvalidState(state));
        }
        if state == JobState::Foreground
            && let Some(holder) = self.foreground()
        {
            return Err(JobError::ForegroundBusy(holder.id));
        }

        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(JobError::TableFull)?;

        let id = self.allocate_id();
        self.slots[slot] = Some(Job {
            id,
            pid,
            state,
            command: command.into(),
        });
        Ok(id)
    }

    /// Clear the slot holding `pid`, returning the job that was there.
    pub fn remove(&mut self, pid: u32) -> Option<Job> {
        if pid < 1 {
            return None;
        }
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|job| job.pid == pid))?;
        let job = slot.take();

        self.next_id = self.wrap(self.max_id() + 1);
        job
    }

    /// Find a job by process id.
    pub fn find_by_pid(&self, pid: u32) -> Option<&Job> {
        if pid < 1 {
            return None;
        }
        self.jobs().find(|job| job.pid == pid)
    }

    /// Find a job by job id.
    pub fn find_by_jid(&self, id: JobId) -> Option<&Job> {
        if id.0 < 1 {
            return None;
        }
        self.jobs().find(|job| job.id == id)
    }

    /// Map a process id to its job id.
    pub fn pid_to_jid(&self, pid: u32) -> Option<JobId> {
        self.find_by_pid(pid).map(|job| job.id)
    }

    /// Process id of the foreground job, if any.
    pub fn foreground_pid(&self) -> Option<u32> {
        self.foreground().map(|job| job.pid)
    }

    /// Change the state of the job holding `pid`, returning the old state.
    ///
    /// Refuses to make a second job Foreground and refuses `Undefined`.
    pub fn set_state(&mut self, pid: u32, state: JobState) -> JobResult<JobState> {
        if state == JobState::Undefined {
            return Err(JobError::InvalidState(state));
        }
        if state == JobState::Foreground
            && let Some(holder) = self.foreground()
            && holder.pid != pid
        {
            return Err(JobError::ForegroundBusy(holder.id));
        }

        let job = self
            .slots
            .iter_mut()
            .flatten()
            .find(|job| job.pid == pid)
            .ok_or(JobError::NoSuchProcess(pid))?;
        Ok(std::mem::replace(&mut job.state, state))
    }

    /// Snapshots of every live job in slot order.
    pub fn list(&self) -> Vec<JobInfo> {
        self.jobs().map(Job::info).collect()
    }

    /// Clear every slot, returning the jobs that were live.
    pub fn clear(&mut self) -> Vec<Job> {
        let jobs = self.slots.iter_mut().filter_map(Option::take).collect();
        self.next_id = 1;
        jobs
    }

    /// Live jobs in slot order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.slots.iter().flatten()
    }

    fn foreground(&self) -> Option<&Job> {
        self.jobs().find(|job| job.state == JobState::Foreground)
    }

    fn max_id(&self) -> u32 {
        self.jobs().map(|job| job.id.0).max().unwrap_or(0)
    }

    fn holds_id(&self, id: u32) -> bool {
        self.jobs().any(|job| job.id.0 == id)
    }

    /// Ids run from 1 to capacity; anything past the end wraps to 1.
    fn wrap(&self, id: u32) -> u32 {
        if id == 0 || id as usize > self.capacity() { 1 } else { id }
    }

    /// Only called with a free slot, so at least one id in range is unused.
    fn allocate_id(&mut self) -> JobId {
        let mut candidate = self.wrap(self.next_id);
        for _ in 0..self.capacity() {
            if !self.holds_id(candidate) {
                break;
            }
            candidate = self.wrap(candidate + 1);
        }
        self.next_id = self.wrap(candidate + 1);
        JobId(candidate)
    }
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_JOBS)
    }
}

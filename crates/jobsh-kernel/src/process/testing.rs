//! Scripted process control for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::{ChildEvent, ProcessControl, Signal, SpawnRequest};
use crate::error::{JobError, JobResult};

/// First pid handed out by [`FakeProcesses`].
pub const FIRST_FAKE_PID: u32 = 1000;

/// Process control that records what the shell asked for.
///
/// `spawn` hands out increasing fake pids, `signal_group` records the signal,
/// and `reap_next` pops events queued with [`FakeProcesses::push_event`].
pub struct FakeProcesses {
    next_pid: AtomicU32,
    events: Mutex<VecDeque<ChildEvent>>,
    signals: Mutex<Vec<(u32, Signal)>>,
    spawned: Mutex<Vec<SpawnRequest>>,
    fail_spawn: Mutex<Option<std::io::ErrorKind>>,
}

impl FakeProcesses {
    pub fn new() -> Self {
        Self {
            next_pid: AtomicU32::new(FIRST_FAKE_PID),
            events: Mutex::new(VecDeque::new()),
            signals: Mutex::new(Vec::new()),
            spawned: Mutex::new(Vec::new()),
            fail_spawn: Mutex::new(None),
        }
    }

    /// Queue a child status change for the next reconcile.
    pub fn push_event(&self, event: ChildEvent) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push_back(event);
    }

    /// Number of queued events not yet reaped.
    pub fn pending_events(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Every `(pgid, signal)` sent so far.
    pub fn signals(&self) -> Vec<(u32, Signal)> {
        self.signals.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Every spawn request seen so far.
    pub fn spawned(&self) -> Vec<SpawnRequest> {
        self.spawned.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make the next spawn fail with an I/O error of `kind`.
    pub fn fail_next_spawn(&self, kind: std::io::ErrorKind) {
        *self.fail_spawn.lock().unwrap_or_else(|e| e.into_inner()) = Some(kind);
    }
}

impl Default for FakeProcesses {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl for FakeProcesses {
    fn spawn(&self, request: &SpawnRequest) -> JobResult<u32> {
        if let Some(kind) = self.fail_spawn.lock().unwrap_or_else(|e| e.into_inner()).take() {
            return Err(JobError::from_spawn(&request.program, std::io::Error::from(kind)));
        }
        self.spawned.lock().unwrap_or_else(|e| e.into_inner()).push(request.clone());
        Ok(self.next_pid.fetch_add(1, Ordering::SeqCst))
    }

    fn signal_group(&self, pgid: u32, signal: Signal) -> JobResult<()> {
        self.signals.lock().unwrap_or_else(|e| e.into_inner()).push((pgid, signal));
        Ok(())
    }

    fn reap_next(&self) -> JobResult<Option<ChildEvent>> {
        Ok(self.events.lock().unwrap_or_else(|e| e.into_inner()).pop_front())
    }
}

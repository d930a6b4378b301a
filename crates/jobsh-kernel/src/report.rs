//! Where asynchronous job notices go.
//!
//! Builtins return their text in an `ExecResult`, but the reconciler and the
//! signal listeners run on their own tasks and print whenever a child changes
//! state. They write through a [`Reporter`].

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Sink for user-visible notices.
pub trait Reporter: Send + Sync {
    /// Emit one line (without trailing newline).
    fn report(&self, line: &str);
}

/// Writes notices to standard output and flushes immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            tracing::warn!("failed to write notice: {}", e);
        }
    }
}

/// Collects notices in memory. Used by tests and embedders.
#[derive(Debug, Default, Clone)]
pub struct BufferReporter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Drain everything reported so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Reporter for BufferReporter {
    fn report(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.to_string());
    }
}

//! Scheduler module for jobsh: the job table and everything that touches it.
//!
//! This module provides:
//! - **Job table**: fixed-capacity registry of tracked processes.
//! - **Job manager**: the one shared owner of the table; its guard is the
//!   window in which child reaping is deferred.
//! - **Reconciler**: reaps children on SIGCHLD and applies their state changes.
//! - **Foreground gate**: lets the main flow wait for the foreground job.
//!
//! # Architecture
//!
//! ```text
//!   main flow                                   SIGCHLD task
//! ┌──────────────────┐                     ┌────────────────────┐
//! │ Kernel::execute  │                     │ Reconciler         │
//! │  spawn+register ─┼──┐             ┌────┼─ lock, drain       │
//! │  fg / bg / quit ─┼──┤  JobsGuard  │    │  waitpid(WNOHANG)  │
//! └────────┬─────────┘  ▼             ▼    └────────────────────┘
//!          │        ┌────────────────────┐
//!          │        │ JobManager         │──revision──┐
//!          │        │  JobTable (slots)  │            │
//!          │        └────────────────────┘            ▼
//!          └─────────────────────────────────▶ ForegroundGate
//! ```

mod gate;
mod manager;
mod reconciler;
mod table;

pub use gate::{ForegroundGate, GateExit};
pub use manager::{JobManager, JobsGuard};
pub use reconciler::{Applied, Reconciler};
pub use table::{Job, JobTable};

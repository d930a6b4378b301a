//! Builtin commands for jobsh.
//!
//! A line whose first word names a builtin runs in the shell itself instead
//! of launching a process. The set is fixed: `quit`, `jobs`, `fg`, `bg`.
//!
//! # Architecture
//!
//! ```text
//! BuiltinRegistry
//! ├── quit   terminate every job, end the shell
//! ├── jobs   list the job table
//! ├── fg     continue a job in the foreground and wait for it
//! └── bg     continue a job in the background
//! ```

mod builtin;
mod context;
mod registry;
mod traits;

pub use builtin::register_builtins;
pub use context::ExecContext;
pub use registry::BuiltinRegistry;
pub use traits::Builtin;

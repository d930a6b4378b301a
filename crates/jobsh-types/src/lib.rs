//! Pure data types for jobsh: job ids, job states, execution results.
//!
//! This crate is a leaf dependency with no async runtime and no OS calls.
//! It exists so that front ends can talk about jobs and results without
//! pulling in the kernel's process-control stack.

pub mod job;
pub mod result;

// Flat re-exports for convenience
pub use job::*;
pub use result::*;

//! Core builtin trait.

use async_trait::async_trait;
use jobsh_types::ExecResult;

use super::context::ExecContext;

/// A command that runs inside the shell process.
#[async_trait]
pub trait Builtin: Send + Sync {
    /// Name the command is invoked by.
    fn name(&self) -> &str;

    /// One-line usage string.
    fn usage(&self) -> &str;

    /// Run with the words after the command name.
    async fn execute(&self, args: &[String], ctx: &mut ExecContext) -> ExecResult;
}

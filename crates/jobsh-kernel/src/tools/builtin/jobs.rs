//! jobs: List the job table.

use async_trait::async_trait;
use jobsh_types::ExecResult;

use crate::tools::{Builtin, ExecContext};

/// Jobs builtin: one line per live job in slot order.
pub struct Jobs;

#[async_trait]
impl Builtin for Jobs {
    fn name(&self) -> &str {
        "jobs"
    }

    fn usage(&self) -> &str {
        "jobs"
    }

    async fn execute(&self, _args: &[String], ctx: &mut ExecContext) -> ExecResult {
        let mut out = String::new();
        for job in ctx.jobs.list().await {
            out.push_str(&format!("{job}\n"));
        }
        ExecResult::success(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::context;
    use jobsh_types::JobState;

    #[tokio::test]
    async fn empty_table_prints_nothing() {
        let (mut ctx, _, _) = context();
        let result = Jobs.execute(&[], &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "");
    }

    #[tokio::test]
    async fn lists_each_state() {
        let (mut ctx, jobs, _) = context();
        {
            let mut table = jobs.lock().await;
            table.insert(101, JobState::Background, "sleep 5 &").expect("insert");
            table.insert(102, JobState::Stopped, "sleep 7").expect("insert");
        }

        let result = Jobs.execute(&[], &mut ctx).await;
        assert_eq!(
            result.out,
            "[1] (101) Running sleep 5 &\n[2] (102) Stopped sleep 7\n"
        );
    }
}

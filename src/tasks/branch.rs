use crate::error::Result;
use crate::execution::{GitTask, TaskContext};

/// Publishes `branch`: the checked-out branch, or the commit id on a detached HEAD.
#[derive(Debug, Default)]
pub struct BranchTask;

impl GitTask for BranchTask {
    fn name(&self) -> &'static str {
        "branch"
    }

    fn run(&mut self, ctx: &mut TaskContext<'_>) -> Result<()> {
        let branch = match ctx.repository().branch()? {
            Some(branch) => branch,
            None => ctx.repository().head_commit()?.id,
        };
        ctx.publish("branch", &branch);
        Ok(())
    }
}

use crate::error::Result;
use crate::execution::{GitTask, TaskContext};

/// Publishes `describe`: the nearest tag description of the resolved ref.
#[derive(Debug, Default)]
pub struct DescribeTask;

impl GitTask for DescribeTask {
    fn name(&self) -> &'static str {
        "describe"
    }

    fn run(&mut self, ctx: &mut TaskContext<'_>) -> Result<()> {
        let described = ctx
            .repository()
            .describe()
            .map_err(|e| e.into_task("Unable to describe the head commit"))?;
        let described = ctx.flag_dirty(&described)?;
        ctx.publish("describe", &described);
        Ok(())
    }
}

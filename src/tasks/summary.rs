//! Human-readable repository summary.

use crate::error::Result;
use crate::execution::{GitTask, TaskContext};

/// Writes one `key: value` line per fact to the output sink:
///
/// ```text
/// ref: HEAD
/// commit: 3f2a9c1...-dirty
/// branch: main
/// describe: v1.2.0-3-g3f2a9c1-dirty
/// ```
///
/// The footer is appended by the execution controller.
#[derive(Debug, Default)]
pub struct SummaryTask;

impl GitTask for SummaryTask {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn produces_output(&self) -> bool {
        true
    }

    fn run(&mut self, ctx: &mut TaskContext<'_>) -> Result<()> {
        let commit = ctx.repository().head_commit()?;
        let commit_id = ctx.flag_dirty(&commit.id)?;
        let branch = ctx
            .repository()
            .branch()?
            .unwrap_or_else(|| "(detached)".to_string());
        let described = ctx.repository().describe()?;
        let described = ctx.flag_dirty(&described)?;

        let head = ctx.config().head.clone();
        let sink = ctx.sink()?;
        sink.write_line(&format!("ref: {}", head))?;
        sink.write_line(&format!("commit: {}", commit_id))?;
        sink.write_line(&format!("branch: {}", branch))?;
        sink.write_line(&format!("describe: {}", described))?;
        Ok(())
    }
}

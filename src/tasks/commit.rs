//! Commit identity and authorship properties.

use crate::error::Result;
use crate::execution::{GitTask, TaskContext};

/// Publishes `commit.*` properties for the resolved head commit.
///
/// | name | value |
/// |---|---|
/// | `commit.id`, `commit.sha` | full id, dirty-flagged |
/// | `commit.abbrev` | abbreviated id, dirty-flagged |
/// | `commit.author.{name,email,date}` | author identity and date |
/// | `commit.committer.{name,email,date}` | committer identity and date |
/// | `commit.dirty` | `true` or `false` |
#[derive(Debug, Default)]
pub struct CommitTask;

impl GitTask for CommitTask {
    fn name(&self) -> &'static str {
        "commit"
    }

    fn run(&mut self, ctx: &mut TaskContext<'_>) -> Result<()> {
        let commit = ctx
            .repository()
            .head_commit()
            .map_err(|e| e.into_task("Unable to read the head commit"))?;
        let dirty = ctx
            .is_dirty()
            .map_err(|e| e.into_task("Unable to determine working tree status"))?;

        let id = ctx.config().flag_dirty(&commit.id, dirty);
        let abbrev = ctx.config().flag_dirty(&commit.abbrev, dirty);
        let author_date = ctx.format_date(&commit.author_time)?;
        let committer_date = ctx.format_date(&commit.committer_time)?;

        ctx.publish("commit.id", &id);
        ctx.publish("commit.sha", &id);
        ctx.publish("commit.abbrev", &abbrev);
        ctx.publish("commit.author.name", &commit.author_name);
        ctx.publish("commit.author.email", &commit.author_email);
        ctx.publish("commit.author.date", &author_date);
        ctx.publish("commit.committer.name", &commit.committer_name);
        ctx.publish("commit.committer.email", &commit.committer_email);
        ctx.publish("commit.committer.date", &committer_date);
        ctx.publish("commit.dirty", if dirty { "true" } else { "false" });
        Ok(())
    }
}

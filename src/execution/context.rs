//! What a task sees while it runs.

use crate::config::Configuration;
use crate::error::{GitMetaError, Result};
use crate::output::{OutputSink, format_timestamp};
use crate::properties::{PropertyStore, publish};
use crate::repository::RepositoryHandle;
use chrono::{DateTime, Local, Utc};

/// Resources lent to [`super::GitTask::run`] for the duration of one run.
pub struct TaskContext<'a> {
    pub(super) config: &'a Configuration,
    pub(super) repository: &'a dyn RepositoryHandle,
    pub(super) sink: Option<&'a mut OutputSink>,
    pub(super) properties: &'a mut PropertyStore,
}

impl<'a> TaskContext<'a> {
    pub fn config(&self) -> &Configuration {
        self.config
    }

    pub fn repository(&self) -> &dyn RepositoryHandle {
        self.repository
    }

    /// The output sink; only available to tasks that produce output.
    pub fn sink(&mut self) -> Result<&mut OutputSink> {
        self.sink.as_deref_mut().ok_or_else(|| {
            GitMetaError::Write(std::io::Error::other(
                "no output sink is open for this task",
            ))
        })
    }

    /// Publish `value` under `name` for every configured prefix.
    pub fn publish(&mut self, name: &str, value: &str) {
        publish(self.properties, name, value, &self.config.property_prefixes);
    }

    /// Render `time` in local time with the configured date format.
    pub fn format_date(&self, time: &DateTime<Utc>) -> Result<String> {
        format_timestamp(&time.with_timezone(&Local), &self.config.date_format)
    }

    /// Whether the working tree is dirty, honoring `dirty_ignore_untracked`.
    pub fn is_dirty(&self) -> Result<bool> {
        self.repository.is_dirty(self.config.dirty_ignore_untracked)
    }

    /// `value` with the dirty flag appended when the working tree is dirty.
    ///
    /// The working tree is not inspected when dirty flagging is disabled.
    pub fn flag_dirty(&self, value: &str) -> Result<String> {
        if self.config.dirty_flag.is_none() {
            return Ok(value.to_string());
        }
        let dirty = self.is_dirty()?;
        Ok(self.config.flag_dirty(value, dirty))
    }
}

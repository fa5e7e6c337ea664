//! Scoped ownership of the resources acquired for one invocation.

use super::context::TaskContext;
use super::{ExecutionEnv, GitTask};
use crate::config::Configuration;
use crate::error::Result;
use crate::output::OutputSink;
use crate::properties::PropertyStore;
use crate::repository::RepositoryHandle;
use tracing::debug;

/// RAII guard over the repository handle and output sink of one invocation.
///
/// When dropped, both are released; [`Session::cleanup`] may also be called
/// explicitly. Each resource is released exactly once.
pub(super) struct Session {
    config: Configuration,
    repository: Box<dyn RepositoryHandle>,
    sink: Option<OutputSink>,
    cleaned_up: bool,
}

impl Session {
    pub(super) fn new(config: Configuration, repository: Box<dyn RepositoryHandle>) -> Self {
        Self {
            config,
            repository,
            sink: None,
            cleaned_up: false,
        }
    }

    pub(super) fn config(&self) -> &Configuration {
        &self.config
    }

    pub(super) fn attach_sink(&mut self, sink: OutputSink) {
        self.sink = Some(sink);
    }

    /// Run `task`, then append the footer to the sink if one is attached.
    pub(super) fn run(
        &mut self,
        task: &mut dyn GitTask,
        properties: &mut PropertyStore,
        env: &ExecutionEnv<'_>,
    ) -> Result<()> {
        let mut ctx = TaskContext {
            config: &self.config,
            repository: &*self.repository,
            sink: self.sink.as_mut(),
            properties,
        };
        task.run(&mut ctx)?;

        if let Some(sink) = self.sink.as_mut() {
            sink.footer(
                &self.config.footer,
                env.version,
                &env.now,
                &self.config.date_format,
            )?;
        }
        Ok(())
    }

    /// Close the sink (if any) and the repository. Idempotent, never fails.
    pub(super) fn cleanup(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;

        if let Some(sink) = self.sink.as_mut() {
            sink.close();
        }
        self.repository.close();
        debug!("session resources released");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cleanup();
    }
}

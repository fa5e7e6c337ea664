//! Execution lifecycle shared by every metadata task.
//!
//! [`execute`] drives one invocation:
//!
//! 1. `skip` set: return [`Outcome::Skipped`] without touching anything.
//! 2. Resolve parameters and open the repository. If that fails and
//!    `skip_no_git` is set, return [`Outcome::NoRepository`]; otherwise the
//!    failure becomes a task error.
//! 3. Open the output sink for tasks that produce output.
//! 4. Run the task, then append the footer to the sink.
//! 5. Release the sink and the repository on every exit path.
//!
//! A task error is reported as a [`BuildFailure`] whose severity is
//! [`Severity::Soft`] with `fail_gracefully`, [`Severity::Hard`] otherwise.

mod context;
mod session;


pub use context::TaskContext;

use crate::config::{Configuration, RawConfig, resolve};
use crate::error::{BuildFailure, Result, Severity};
use crate::output::{OutputSink, SharedWriter};
use crate::properties::PropertyStore;
use crate::repository::{self, RepositoryOpener};
use chrono::{DateTime, Local};
use session::Session;
use tracing::{debug, info, warn};

/// A concrete metadata task.
pub trait GitTask {
    /// Name used in log output.
    fn name(&self) -> &'static str;

    /// Whether the task writes generated content to an output sink.
    fn produces_output(&self) -> bool {
        false
    }

    /// Task-specific parameter checks, run after resolution and before any
    /// resource is acquired.
    fn prepare(&mut self, _config: &Configuration) -> Result<()> {
        Ok(())
    }

    /// The task logic.
    fn run(&mut self, ctx: &mut TaskContext<'_>) -> Result<()>;
}

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The task ran to completion.
    Completed,
    /// `skip` was set; nothing ran.
    Skipped,
    /// No usable repository and `skip_no_git` was set; nothing ran.
    NoRepository,
}

/// Collaborators supplied by the caller of [`execute`].
pub struct ExecutionEnv<'a> {
    pub opener: &'a dyn RepositoryOpener,
    /// Sink used when no output file is configured.
    pub stdout: SharedWriter,
    pub version: Option<&'a str>,
    pub now: DateTime<Local>,
}

impl<'a> ExecutionEnv<'a> {
    /// Environment with the embedded gitmeta version and the current time.
    pub fn new(opener: &'a dyn RepositoryOpener, stdout: SharedWriter) -> Self {
        Self {
            opener,
            stdout,
            version: crate::version::current_version(),
            now: Local::now(),
        }
    }

    pub fn with_version(mut self, version: Option<&'a str>) -> Self {
        self.version = version;
        self
    }

    pub fn with_now(mut self, now: DateTime<Local>) -> Self {
        self.now = now;
        self
    }
}

/// Execute `task` under the lifecycle described in the module docs.
pub fn execute(
    raw: RawConfig,
    task: &mut dyn GitTask,
    env: &ExecutionEnv<'_>,
    properties: &mut PropertyStore,
) -> std::result::Result<Outcome, BuildFailure> {
    if raw.skip {
        info!(task = task.name(), "skipping execution");
        return Ok(Outcome::Skipped);
    }

    let fail_gracefully = raw.fail_gracefully;
    match run_lifecycle(raw, task, env, properties) {
        Ok(outcome) => Ok(outcome),
        Err(error) => {
            let severity = if fail_gracefully {
                Severity::Soft
            } else {
                Severity::Hard
            };
            warn!(task = task.name(), ?severity, error = %error, "task failed");
            Err(BuildFailure::new(severity, error.into_task_error()))
        }
    }
}

fn run_lifecycle(
    raw: RawConfig,
    task: &mut dyn GitTask,
    env: &ExecutionEnv<'_>,
    properties: &mut PropertyStore,
) -> Result<Outcome> {
    let Some(mut session) = init(raw, task, env)? else {
        return Ok(Outcome::NoRepository);
    };

    debug!(task = task.name(), "running task");
    let result = session.run(task, properties, env);
    session.cleanup();

    result.map(|()| Outcome::Completed)
}

/// Resolve parameters and acquire resources.
///
/// Returns `None` when no usable repository was found and `skip_no_git` is set.
fn init(
    raw: RawConfig,
    task: &mut dyn GitTask,
    env: &ExecutionEnv<'_>,
) -> Result<Option<Session>> {
    let config = resolve(raw);
    task.prepare(&config)?;

    let handle = match repository::open(
        env.opener,
        &config.base_dir,
        config.git_dir.as_deref(),
        &config.head,
    ) {
        Ok(handle) => handle,
        Err(e) if config.skip_no_git => {
            info!(task = task.name(), error = %e, "no usable Git repository, skipping");
            return Ok(None);
        }
        Err(e) => return Err(e.into_task("Unable to initialize Git repository")),
    };

    // From here on the session owns the handle and releases it on every path.
    let mut session = Session::new(config, handle);

    if task.produces_output() {
        let config = session.config();
        let sink = OutputSink::open(config.output_file.as_deref(), &config.encoding, &env.stdout)?;
        session.attach_sink(sink);
    }

    Ok(Some(session))
}

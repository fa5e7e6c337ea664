//! Error types for gitmeta.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Component errors are wrapped into [`GitMetaError::Task`] by the tasks and
//! the execution controller; only the controller turns a task error into a
//! [`BuildFailure`] with a severity.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gitmeta operations.
#[derive(Error, Debug)]
pub enum GitMetaError {
    /// A setting is malformed or missing.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No repository could be found at or above the working-tree root.
    #[error("no Git repository found at or above '{}'", .path.display())]
    RepositoryUnavailable { path: PathBuf },

    /// The repository exists but cannot be read, or the ref cannot be resolved.
    #[error("Git repository access failed: {0}")]
    RepositoryAccess(String),

    /// The output file cannot be created or written.
    #[error("Could not open output file \"{}\" for writing: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to an already opened sink failed.
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),

    /// A component error raised while a task was executing.
    #[error("{message}")]
    Task {
        message: String,
        #[source]
        source: Box<GitMetaError>,
    },
}

impl GitMetaError {
    /// Wrap this error into a task error carrying `message`.
    pub fn into_task(self, message: impl Into<String>) -> Self {
        GitMetaError::Task {
            message: message.into(),
            source: Box::new(self),
        }
    }

    /// Wrap this error into a task error under its own message.
    ///
    /// Task errors are returned unchanged.
    pub fn into_task_error(self) -> Self {
        match self {
            GitMetaError::Task { .. } => self,
            other => {
                let message = other.to_string();
                other.into_task(message)
            }
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GitMetaError::Config(_) => exit_codes::CONFIG_ERROR,
            GitMetaError::Task { source, .. } => source.exit_code(),
            _ => exit_codes::BUILD_FAILURE,
        }
    }
}

/// Result type alias for gitmeta operations.
pub type Result<T> = std::result::Result<T, GitMetaError>;

/// How a failed invocation is reported to the surrounding build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The build may continue.
    Soft,
    /// The build must stop.
    Hard,
}

/// Final failure of one invocation, as seen by the build.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct BuildFailure {
    pub severity: Severity,
    #[source]
    pub error: GitMetaError,
}

impl BuildFailure {
    pub fn new(severity: Severity, error: GitMetaError) -> Self {
        Self { severity, error }
    }

    /// Returns true if the build should stop.
    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }

    /// Exit code for the process: soft failures let the build continue.
    pub fn exit_code(&self) -> i32 {
        match self.severity {
            Severity::Soft => exit_codes::SUCCESS,
            Severity::Hard => self.error.exit_code(),
        }
    }
}

//! Repository lifecycle for gitmeta.
//!
//! The execution controller only talks to a repository through the
//! [`RepositoryHandle`] trait. Handles are produced by a [`RepositoryOpener`];
//! [`open`] runs the full acquisition sequence (open, check, resolve the
//! configured ref) and guarantees the handle is closed again if any later
//! step fails.
//!
//! The default backend, [`GitCliRepository`], drives the `git` binary.

mod discovery;
mod git_cli;


pub use discovery::{Discovered, discover_git_dir};
pub use git_cli::{GitCliOpener, GitCliRepository};

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

/// Identity and authorship of a single commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: String,
    pub abbrev: String,
    pub author_name: String,
    pub author_email: String,
    pub author_time: DateTime<Utc>,
    pub committer_name: String,
    pub committer_email: String,
    pub committer_time: DateTime<Utc>,
}

/// An open repository, exclusively owned by one invocation.
///
/// Every method except `close` and `is_closed` fails with a
/// `RepositoryAccess` error once the handle has been closed.
pub trait RepositoryHandle {
    /// Validate that the repository is structurally usable.
    fn check(&mut self) -> Result<()>;

    /// Resolve `head` to a commit and use it for all later lookups.
    fn set_head_ref(&mut self, head: &str) -> Result<()>;

    /// The resolved head commit.
    fn head_commit(&self) -> Result<CommitInfo>;

    /// Short name of the checked-out branch; `None` for a detached HEAD.
    fn branch(&self) -> Result<Option<String>>;

    /// `git describe`-style description of the resolved head commit.
    fn describe(&self) -> Result<String>;

    /// Whether the working tree has uncommitted changes.
    ///
    /// Untracked files only count when `ignore_untracked` is false.
    fn is_dirty(&self, ignore_untracked: bool) -> Result<bool>;

    /// Release the handle. Safe to call more than once.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Factory for repository handles.
pub trait RepositoryOpener {
    /// Locate and open the repository. `git_dir` overrides discovery from `base_dir`.
    fn open(&self, base_dir: &Path, git_dir: Option<&Path>) -> Result<Box<dyn RepositoryHandle>>;
}

/// Open, check and position a repository handle.
///
/// If `check` or ref resolution fails, the freshly opened handle is closed
/// before the error is returned.
pub fn open(
    opener: &dyn RepositoryOpener,
    base_dir: &Path,
    git_dir: Option<&Path>,
    head: &str,
) -> Result<Box<dyn RepositoryHandle>> {
    let mut handle = opener.open(base_dir, git_dir)?;

    let prepared = handle.check().and_then(|()| handle.set_head_ref(head));
    if let Err(e) = prepared {
        handle.close();
        return Err(e);
    }

    debug!(base_dir = %base_dir.display(), head = %head, "repository opened");
    Ok(handle)
}

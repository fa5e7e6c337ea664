//! Git dir discovery by walking up from a working-tree path.

use crate::error::{GitMetaError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A discovered repository location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    /// Directory that contains the `.git` entry.
    pub work_tree: PathBuf,
    /// The git dir itself (resolved through a gitfile when needed).
    pub git_dir: PathBuf,
}

/// Find the git dir for `start` by checking `start` and each ancestor for a
/// `.git` directory or gitfile (`gitdir: <path>`, as used by linked worktrees
/// and submodules).
///
/// # Returns
///
/// * `Ok(Discovered)` - The nearest repository
/// * `Err(GitMetaError::RepositoryUnavailable)` - `start` does not exist or no
///   ancestor contains a repository
pub fn discover_git_dir(start: &Path) -> Result<Discovered> {
    let unavailable = || GitMetaError::RepositoryUnavailable {
        path: start.to_path_buf(),
    };

    let start = fs::canonicalize(start).map_err(|_| unavailable())?;

    for dir in start.ancestors() {
        let candidate = dir.join(".git");
        if candidate.is_dir() {
            return Ok(Discovered {
                work_tree: dir.to_path_buf(),
                git_dir: candidate,
            });
        }
        if candidate.is_file()
            && let Some(git_dir) = read_gitfile(&candidate)
        {
            return Ok(Discovered {
                work_tree: dir.to_path_buf(),
                git_dir,
            });
        }
    }

    Err(unavailable())
}

/// Resolve the target of a gitfile; relative targets are relative to the file.
fn read_gitfile(path: &Path) -> Option<PathBuf> {
    let content = fs::read_to_string(path).ok()?;
    let target = content.lines().next()?.strip_prefix("gitdir:")?.trim();
    if target.is_empty() {
        return None;
    }

    let target = Path::new(target);
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        path.parent()?.join(target)
    };
    resolved.is_dir().then_some(resolved)
}

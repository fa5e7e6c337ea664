//! Git command runner for gitmeta.
//!
//! Provides a thin wrapper around `git` subprocess calls with captured
//! stdout/stderr and structured error handling. All git invocations of the
//! default repository backend go through this module.

use crate::error::{GitMetaError, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};
use tracing::trace;

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }
}

/// Run a git command with the specified working directory.
///
/// `args` may contain global options such as `--git-dir=...` before the
/// subcommand.
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(GitMetaError::RepositoryAccess)` - If git cannot be spawned or exits non-zero
pub fn run_git<P, S>(cwd: P, args: &[S]) -> Result<GitOutput>
where
    P: AsRef<Path>,
    S: AsRef<OsStr>,
{
    let cwd = cwd.as_ref();
    let subcommand = subcommand_name(args);
    trace!(cwd = %cwd.display(), subcommand = %subcommand, "running git");

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            GitMetaError::RepositoryAccess(format!(
                "failed to execute git {}: {} (is git installed?)",
                subcommand, e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(GitMetaError::RepositoryAccess(format!(
            "git {} failed (exit code {}): {}",
            subcommand, exit_code, error_msg
        )))
    }
}

/// First argument that is not a global `--option`.
fn subcommand_name<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter()
        .map(|a| a.as_ref().to_string_lossy())
        .find(|a| !a.starts_with("--"))
        .map(|a| a.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_repo;
    use tempfile::TempDir;

    #[test]
    fn test_run_git_captures_stdout() {
        let temp_dir = create_test_repo();
        let output = run_git(temp_dir.path(), &["rev-parse", "--show-toplevel"]).unwrap();
        assert!(!output.stdout.is_empty());
    }

    #[test]
    fn test_run_git_failure_returns_repository_access_error() {
        let temp_dir = create_test_repo();
        let err = run_git(temp_dir.path(), &["checkout", "nonexistent-branch"]).unwrap_err();
        assert!(matches!(err, GitMetaError::RepositoryAccess(_)));
        assert!(err.to_string().contains("git checkout failed"));
    }

    #[test]
    fn test_run_git_outside_repository_fails() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_string_lossy().to_string();
        let git_dir = format!("--git-dir={}/.git", dir);
        let result = run_git(temp_dir.path(), &[git_dir.as_str(), "rev-parse", "HEAD"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_name_skips_global_options() {
        assert_eq!(
            subcommand_name(&["--git-dir=/x/.git", "--work-tree=/x", "status"]),
            "status"
        );
        assert_eq!(subcommand_name::<&str>(&[]), "");
    }

    #[test]
    fn test_git_output_is_empty() {
        let empty = GitOutput {
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(empty.is_empty());
    }
}

//! Repository backend driving the `git` command-line tool.

use super::discovery::discover_git_dir;
use super::{CommitInfo, RepositoryHandle, RepositoryOpener};
use crate::error::{GitMetaError, Result};
use crate::git::{GitOutput, run_git};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Field separator for `git log --format` output.
const FIELD_SEP: char = '\u{0}';

/// Opens [`GitCliRepository`] handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCliOpener;

impl RepositoryOpener for GitCliOpener {
    fn open(&self, base_dir: &Path, git_dir: Option<&Path>) -> Result<Box<dyn RepositoryHandle>> {
        Ok(Box::new(GitCliRepository::open(base_dir, git_dir)?))
    }
}

/// A repository accessed through `git --git-dir=... --work-tree=...`.
#[derive(Debug)]
pub struct GitCliRepository {
    work_tree: PathBuf,
    git_dir: PathBuf,
    /// Commit id the configured ref resolved to.
    head_commit: Option<String>,
    closed: bool,
}

impl GitCliRepository {
    /// Locate the repository for `base_dir`.
    ///
    /// With an explicit `git_dir` the working tree is `base_dir` itself;
    /// otherwise both are discovered by walking up from `base_dir`.
    pub fn open(base_dir: &Path, git_dir: Option<&Path>) -> Result<Self> {
        let (work_tree, git_dir) = match git_dir {
            Some(git_dir) => {
                let git_dir = base_dir.join(git_dir);
                if !git_dir.is_dir() {
                    return Err(GitMetaError::RepositoryUnavailable { path: git_dir });
                }
                (base_dir.to_path_buf(), git_dir)
            }
            None => {
                let found = discover_git_dir(base_dir)?;
                (found.work_tree, found.git_dir)
            }
        };

        debug!(
            work_tree = %work_tree.display(),
            git_dir = %git_dir.display(),
            "located repository"
        );

        Ok(Self {
            work_tree,
            git_dir,
            head_commit: None,
            closed: false,
        })
    }

    fn git(&self, args: &[&str]) -> Result<GitOutput> {
        if self.closed {
            return Err(GitMetaError::RepositoryAccess(
                "repository handle used after close".to_string(),
            ));
        }

        let mut full: Vec<String> = vec![
            format!("--git-dir={}", self.git_dir.display()),
            format!("--work-tree={}", self.work_tree.display()),
        ];
        full.extend(args.iter().map(|a| a.to_string()));
        run_git(&self.work_tree, full.as_slice())
    }

    fn resolved_head(&self) -> Result<&str> {
        self.head_commit.as_deref().ok_or_else(|| {
            GitMetaError::RepositoryAccess("no ref has been resolved yet".to_string())
        })
    }
}

impl RepositoryHandle for GitCliRepository {
    fn check(&mut self) -> Result<()> {
        if !self.work_tree.is_dir() {
            return Err(GitMetaError::RepositoryAccess(format!(
                "working tree '{}' does not exist",
                self.work_tree.display()
            )));
        }
        self.git(&["rev-parse", "--git-dir"]).map_err(|e| {
            GitMetaError::RepositoryAccess(format!(
                "'{}' is not a valid Git repository: {}",
                self.git_dir.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn set_head_ref(&mut self, head: &str) -> Result<()> {
        let spec = format!("{}^{{commit}}", head);
        let output = self
            .git(&["rev-parse", "--verify", "--quiet", &spec])
            .map_err(|_| {
                GitMetaError::RepositoryAccess(format!(
                    "ref '{}' cannot be resolved to a commit",
                    head
                ))
            })?;
        debug!(head = %head, commit = %output.stdout, "resolved ref");
        self.head_commit = Some(output.stdout);
        Ok(())
    }

    fn head_commit(&self) -> Result<CommitInfo> {
        let commit = self.resolved_head()?;
        let output = self.git(&[
            "log",
            "-1",
            "--no-show-signature",
            "--format=%H%x00%h%x00%an%x00%ae%x00%at%x00%cn%x00%ce%x00%ct",
            commit,
        ])?;
        parse_commit_info(&output.stdout)
    }

    fn branch(&self) -> Result<Option<String>> {
        self.resolved_head()?;
        // symbolic-ref exits 1 without output on a detached HEAD.
        match self.git(&["symbolic-ref", "--short", "-q", "HEAD"]) {
            Ok(output) if !output.is_empty() => Ok(Some(output.stdout)),
            _ => Ok(None),
        }
    }

    fn describe(&self) -> Result<String> {
        let commit = self.resolved_head()?;
        let output = self.git(&["describe", "--tags", "--always", commit])?;
        Ok(output.stdout)
    }

    fn is_dirty(&self, ignore_untracked: bool) -> Result<bool> {
        let untracked = if ignore_untracked {
            "--untracked-files=no"
        } else {
            "--untracked-files=normal"
        };
        let output = self.git(&["status", "--porcelain", untracked])?;
        Ok(!output.is_empty())
    }

    fn close(&mut self) {
        if !self.closed {
            debug!(git_dir = %self.git_dir.display(), "closing repository");
            self.closed = true;
            self.head_commit = None;
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

fn parse_commit_info(raw: &str) -> Result<CommitInfo> {
    let fields: Vec<&str> = raw.split(FIELD_SEP).collect();
    if fields.len() != 8 {
        return Err(GitMetaError::RepositoryAccess(format!(
            "unexpected commit metadata format ({} fields)",
            fields.len()
        )));
    }

    Ok(CommitInfo {
        id: fields[0].to_string(),
        abbrev: fields[1].to_string(),
        author_name: fields[2].to_string(),
        author_email: fields[3].to_string(),
        author_time: parse_epoch(fields[4])?,
        committer_name: fields[5].to_string(),
        committer_email: fields[6].to_string(),
        committer_time: parse_epoch(fields[7])?,
    })
}

fn parse_epoch(raw: &str) -> Result<DateTime<Utc>> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| GitMetaError::RepositoryAccess(format!("invalid commit timestamp '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commit_info() {
        let raw = "0123456789abcdef0123456789abcdef01234567\u{0}0123456\u{0}Ada\u{0}ada@example.com\u{0}1704164640\u{0}Bob\u{0}bob@example.com\u{0}1704164700";
        let info = parse_commit_info(raw).unwrap();

        assert_eq!(info.id, "0123456789abcdef0123456789abcdef01234567");
        assert_eq!(info.abbrev, "0123456");
        assert_eq!(info.author_name, "Ada");
        assert_eq!(info.author_email, "ada@example.com");
        assert_eq!(info.author_time.timestamp(), 1_704_164_640);
        assert_eq!(info.committer_name, "Bob");
        assert_eq!(info.committer_time.timestamp(), 1_704_164_700);
    }

    #[test]
    fn test_parse_commit_info_rejects_short_records() {
        let err = parse_commit_info("abc\u{0}def").unwrap_err();
        assert!(err.to_string().contains("2 fields"));
    }

    #[test]
    fn test_parse_epoch_rejects_garbage() {
        assert!(parse_epoch("yesterday").is_err());
    }
}

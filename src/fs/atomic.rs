//! Atomic file writes for published property files.
//!
//! All atomic writes follow this pattern:
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Rename the temporary file over the target
//!
//! A build reading the properties file therefore sees either the previous
//! content or the complete new content. On crash a `.{filename}.tmp` file may
//! remain next to the target.

use crate::error::{GitMetaError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating missing parent directories.
///
/// # Returns
///
/// * `Ok(())` - On successful atomic write
/// * `Err(GitMetaError::Output)` - On directory creation, write or rename failure
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| output_error(path, e))?;
    }

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content).map_err(|e| output_error(path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        output_error(path, e)
    })?;

    sync_parent_dir(path);
    Ok(())
}

/// Persist the directory entry of `path`. Best effort.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Generate a temporary file path in the same directory as the target.
fn generate_temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            GitMetaError::Config(format!("invalid output file path '{}'", target.display()))
        })?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let result = File::create(path).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

fn output_error(path: &Path, source: std::io::Error) -> GitMetaError {
    GitMetaError::Output {
        path: std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("git.properties");

        atomic_write(&file_path, b"git.branch=main\n").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "git.branch=main\n");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("git.properties");
        fs::write(&file_path, "stale").unwrap();

        atomic_write_file(&file_path, "fresh").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "fresh");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("target").join("meta").join("git.json");

        atomic_write(&file_path, b"{}").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{}");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("git.properties");

        atomic_write(&file_path, b"content").unwrap();

        assert!(!temp_dir.path().join(".git.properties.tmp").exists());
    }

    #[test]
    fn test_atomic_write_into_file_parent_is_output_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = atomic_write(blocker.join("git.properties"), b"x").unwrap_err();

        assert!(matches!(err, GitMetaError::Output { .. }));
        assert!(err.to_string().contains("git.properties"));
    }

    #[test]
    fn test_generate_temp_path() {
        let target = Path::new("/some/path/git.properties");
        let temp = generate_temp_path(target).unwrap();

        assert_eq!(temp, Path::new("/some/path/.git.properties.tmp"));
    }
}

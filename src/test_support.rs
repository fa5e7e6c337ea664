use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A repository on branch `main` with a single commit touching `README.md`.
pub(crate) fn create_test_repo() -> TempDir {
    create_repo(CreateRepoOptions {
        commits: 1,
        tag: None,
    })
}

/// Like [`create_test_repo`], with a second commit and an annotated tag on it.
pub(crate) fn create_tagged_test_repo(tag: &str) -> TempDir {
    create_repo(CreateRepoOptions {
        commits: 2,
        tag: Some(tag),
    })
}

struct CreateRepoOptions<'a> {
    commits: usize,
    tag: Option<&'a str>,
}

fn create_repo(opts: CreateRepoOptions<'_>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Deterministic default branch name across environments.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    for i in 2..=opts.commits {
        std::fs::write(path.join(format!("file{}.txt", i)), format!("File {}\n", i)).unwrap();
        git(path, &["add", "."]);
        git(path, &["commit", "-m", &format!("Commit {}", i)]);
    }

    if let Some(tag) = opts.tag {
        git(path, &["tag", "-a", tag, "-m", &format!("Release {}", tag)]);
    }

    temp_dir
}

/// Run git in `repo_dir`, panicking with captured output on failure.
pub(crate) fn git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

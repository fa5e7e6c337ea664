//! Embeds the Git version of this checkout so generated footers can name it.
//!
//! When git is unavailable or the source tree is not a repository, nothing is
//! emitted and `version::current_version()` reports no version.

use std::fs;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    emit_head_ref_watch();
    println!("cargo:rerun-if-env-changed=GITMETA_GIT_VERSION");

    let version = std::env::var("GITMETA_GIT_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(git_describe);

    if let Some(version) = version {
        println!("cargo:rustc-env=GITMETA_GIT_VERSION={version}");
    }
}

fn emit_head_ref_watch() {
    let Ok(head) = fs::read_to_string(".git/HEAD") else {
        return;
    };
    let Some(reference) = head.trim().strip_prefix("ref: ") else {
        return;
    };
    println!("cargo:rerun-if-changed=.git/{reference}");
}

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

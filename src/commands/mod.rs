//! Command implementations for gitmeta.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every task command follows the same path: load the
//! config file, layer the CLI options over it, validate unless `skip` is set,
//! run the task through [`crate::execution::execute`], then emit whatever
//! properties it published.
//!
//! Unreadable or unparsable config files are hard failures. Invalid settings
//! follow `fail_gracefully` like any other task failure.

use crate::cli::{Command, GlobalOptions};
use crate::config::{PropertiesFormat, RawConfig};
use crate::error::{BuildFailure, GitMetaError, Result, Severity};
use crate::execution::{ExecutionEnv, GitTask, Outcome, execute};
use crate::output::{SharedWriter, stdout_writer};
use crate::properties::PropertyStore;
use crate::repository::GitCliOpener;
use crate::tasks::{BranchTask, CommitTask, DescribeTask, SummaryTask};
use std::path::Path;
use std::rc::Rc;
use tracing::info;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Output goes to the
/// process's stdout and relative paths resolve against the current directory.
pub fn dispatch(options: &GlobalOptions, command: Command) -> std::result::Result<(), BuildFailure> {
    let cwd = std::env::current_dir().map_err(|e| hard(GitMetaError::Write(e)))?;
    run(options, command, &cwd, &stdout_writer())
}

/// Dispatch with an explicit working directory and stdout.
pub fn run(
    options: &GlobalOptions,
    command: Command,
    cwd: &Path,
    stdout: &SharedWriter,
) -> std::result::Result<(), BuildFailure> {
    let mut config = load_config(options, cwd).map_err(hard)?;
    if config.base_dir.is_relative() {
        config.base_dir = cwd.join(&config.base_dir);
    }
    if let Some(file) = &config.properties_file
        && file.is_relative()
    {
        config.properties_file = Some(cwd.join(file));
    }

    match command {
        Command::Commit => run_task(config, &mut CommitTask, stdout),
        Command::Branch => run_task(config, &mut BranchTask, stdout),
        Command::Describe => run_task(config, &mut DescribeTask, stdout),
        Command::Summary(args) => {
            if let Some(output) = args.output {
                config.output_file = Some(output);
            }
            if let Some(output) = &config.output_file
                && output.is_relative()
            {
                config.output_file = Some(cwd.join(output));
            }
            run_task(config, &mut SummaryTask, stdout)
        }
        Command::Config => {
            config.validate().map_err(hard)?;
            cmd_config(&config, stdout).map_err(hard)
        }
    }
}

/// Config file plus CLI overrides. Not validated yet.
fn load_config(options: &GlobalOptions, cwd: &Path) -> Result<RawConfig> {
    let explicit = options.config.as_ref().map(|path| cwd.join(path));
    let mut config = RawConfig::load_or_default(explicit.as_deref(), cwd)?;
    options.apply_to(&mut config);
    Ok(config)
}

fn run_task(
    config: RawConfig,
    task: &mut dyn GitTask,
    stdout: &SharedWriter,
) -> std::result::Result<(), BuildFailure> {
    let severity = if config.fail_gracefully {
        Severity::Soft
    } else {
        Severity::Hard
    };
    // A skipped run succeeds whatever else is configured.
    if !config.skip {
        config
            .validate()
            .map_err(|e| BuildFailure::new(severity, e))?;
    }

    let properties_file = config.properties_file.clone();
    let properties_format = config.properties_format;

    let opener = GitCliOpener;
    let env = ExecutionEnv::new(&opener, Rc::clone(stdout));
    let mut properties = PropertyStore::new();

    let outcome = execute(config, task, &env, &mut properties)?;
    info!(task = task.name(), ?outcome, published = properties.len(), "task finished");

    if outcome == Outcome::Completed && !properties.is_empty() {
        emit_properties(
            &properties,
            properties_file.as_deref(),
            properties_format,
            stdout,
        )
        .map_err(|e| BuildFailure::new(severity, e.into_task_error()))?;
    }
    Ok(())
}

/// Write `properties` to `file`, or to `stdout` when no file is given.
fn emit_properties(
    properties: &PropertyStore,
    file: Option<&Path>,
    format: PropertiesFormat,
    stdout: &SharedWriter,
) -> Result<()> {
    match file {
        Some(path) => {
            properties.write_to(path, format)?;
            info!(path = %path.display(), "wrote properties file");
        }
        None => {
            let rendered = properties.render(format)?;
            let mut out = stdout.borrow_mut();
            out.write_all(rendered.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

fn cmd_config(config: &RawConfig, stdout: &SharedWriter) -> Result<()> {
    let yaml = config.to_yaml()?;
    let mut out = stdout.borrow_mut();
    out.write_all(yaml.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn hard(error: GitMetaError) -> BuildFailure {
    BuildFailure::new(Severity::Hard, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SummaryArgs;
    use crate::exit_codes;
    use crate::test_support::{create_tagged_test_repo, create_test_repo, git};
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn buffer() -> (Rc<RefCell<Vec<u8>>>, SharedWriter) {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let shared: SharedWriter = buffer.clone();
        (buffer, shared)
    }

    fn contents(buffer: &Rc<RefCell<Vec<u8>>>) -> String {
        String::from_utf8(buffer.borrow().clone()).unwrap()
    }

    #[test]
    fn test_branch_prints_properties_to_stdout() {
        let repo = create_test_repo();
        let (out, stdout) = buffer();

        run(&GlobalOptions::default(), Command::Branch, repo.path(), &stdout).unwrap();

        assert_eq!(contents(&out), "git.branch=main\ngitmeta.branch=main\n");
    }

    #[test]
    fn test_config_file_in_working_directory_is_used() {
        let repo = create_test_repo();
        std::fs::write(
            repo.path().join("gitmeta.yaml"),
            "property_prefixes: [app]\ndirty_flag: false\n",
        )
        .unwrap();
        let (out, stdout) = buffer();

        run(&GlobalOptions::default(), Command::Describe, repo.path(), &stdout).unwrap();

        let abbrev = git(repo.path(), &["rev-parse", "--short", "HEAD"]);
        // The config file itself is untracked, but dirty flagging is off.
        assert_eq!(contents(&out), format!("app.describe={}\n", abbrev));
    }

    #[test]
    fn test_cli_options_override_config_file() {
        let repo = create_tagged_test_repo("v3.1.0");
        std::fs::write(repo.path().join("gitmeta.yaml"), "property_prefixes: [app]\n").unwrap();
        let (out, stdout) = buffer();

        let options = GlobalOptions {
            property_prefixes: vec!["build".to_string()],
            dirty_ignore_untracked: true,
            properties_format: Some(PropertiesFormat::Json),
            ..GlobalOptions::default()
        };
        run(&options, Command::Describe, repo.path(), &stdout).unwrap();

        let json: serde_json::Value = serde_json::from_str(&contents(&out)).unwrap();
        assert_eq!(json["build.describe"], "v3.1.0");
        assert!(json.get("app.describe").is_none());
    }

    #[test]
    fn test_properties_file_is_written() {
        let repo = create_test_repo();
        let (out, stdout) = buffer();

        let options = GlobalOptions {
            properties_file: Some(repo.path().join("target").join("git.properties")),
            property_prefixes: vec!["git".to_string()],
            ..GlobalOptions::default()
        };
        run(&options, Command::Commit, repo.path(), &stdout).unwrap();

        assert!(contents(&out).is_empty());
        let written =
            std::fs::read_to_string(repo.path().join("target").join("git.properties")).unwrap();
        assert!(written.contains("git.commit.author.name=Test User\n"));
        assert!(written.contains("git.commit.dirty="));
    }

    #[test]
    fn test_summary_output_is_relative_to_working_directory() {
        let repo = create_test_repo();
        let (out, stdout) = buffer();

        let command = Command::Summary(SummaryArgs {
            output: Some("target/summary.txt".into()),
        });
        run(&GlobalOptions::default(), command, repo.path(), &stdout).unwrap();

        assert!(contents(&out).is_empty());
        let written =
            std::fs::read_to_string(repo.path().join("target").join("summary.txt")).unwrap();
        assert!(written.starts_with("ref: HEAD\n"));
        assert!(written.contains("Generated by gitmeta"));
    }

    #[test]
    fn test_skip_prints_nothing() {
        let repo = create_test_repo();
        let (out, stdout) = buffer();

        let options = GlobalOptions {
            skip: true,
            ..GlobalOptions::default()
        };
        run(&options, Command::Commit, repo.path(), &stdout).unwrap();

        assert!(contents(&out).is_empty());
    }

    #[test]
    fn test_missing_repository_fails_hard() {
        let dir = TempDir::new().unwrap();
        let (out, stdout) = buffer();

        let options = GlobalOptions {
            git_dir: Some("missing".into()),
            ..GlobalOptions::default()
        };
        let failure = run(&options, Command::Commit, dir.path(), &stdout).unwrap_err();

        assert!(failure.is_hard());
        assert_eq!(failure.exit_code(), exit_codes::BUILD_FAILURE);
        assert!(contents(&out).is_empty());
    }

    #[test]
    fn test_missing_repository_fails_softly_when_graceful() {
        let dir = TempDir::new().unwrap();
        let (_out, stdout) = buffer();

        let options = GlobalOptions {
            git_dir: Some("missing".into()),
            fail_gracefully: true,
            ..GlobalOptions::default()
        };
        let failure = run(&options, Command::Commit, dir.path(), &stdout).unwrap_err();

        assert!(!failure.is_hard());
        assert_eq!(failure.exit_code(), exit_codes::SUCCESS);
    }

    #[test]
    fn test_invalid_config_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("gitmeta.yaml"), "property_prefixes: ['.git']\n").unwrap();
        let (_out, stdout) = buffer();

        let failure =
            run(&GlobalOptions::default(), Command::Commit, dir.path(), &stdout).unwrap_err();

        assert!(failure.is_hard());
        assert_eq!(failure.exit_code(), exit_codes::CONFIG_ERROR);
        assert!(failure.to_string().contains("Use 'git' instead"));
    }

    #[test]
    fn test_skip_succeeds_with_invalid_settings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("gitmeta.yaml"), "property_prefixes: []\n").unwrap();
        let (out, stdout) = buffer();

        let options = GlobalOptions {
            skip: true,
            head: Some(String::new()),
            ..GlobalOptions::default()
        };
        run(&options, Command::Commit, dir.path(), &stdout).unwrap();

        assert!(contents(&out).is_empty());
    }

    #[test]
    fn test_invalid_settings_fail_softly_when_graceful() {
        let dir = TempDir::new().unwrap();
        let (out, stdout) = buffer();

        let options = GlobalOptions {
            fail_gracefully: true,
            property_prefixes: vec![".x".to_string()],
            ..GlobalOptions::default()
        };
        let failure = run(&options, Command::Commit, dir.path(), &stdout).unwrap_err();

        assert!(!failure.is_hard());
        assert_eq!(failure.exit_code(), exit_codes::SUCCESS);
        assert!(failure.to_string().contains("Use 'x' instead"));
        assert!(contents(&out).is_empty());
    }

    #[test]
    fn test_unparsable_config_file_is_hard_even_when_graceful() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("gitmeta.yaml"), "head: [unclosed\n").unwrap();
        let (_out, stdout) = buffer();

        let options = GlobalOptions {
            fail_gracefully: true,
            ..GlobalOptions::default()
        };
        let failure = run(&options, Command::Commit, dir.path(), &stdout).unwrap_err();

        assert!(failure.is_hard());
        assert_eq!(failure.exit_code(), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn test_missing_explicit_config_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let (_out, stdout) = buffer();

        let options = GlobalOptions {
            config: Some("nope.yaml".into()),
            ..GlobalOptions::default()
        };
        let failure = run(&options, Command::Commit, dir.path(), &stdout).unwrap_err();

        assert_eq!(failure.exit_code(), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn test_config_command_prints_effective_yaml() {
        let dir = TempDir::new().unwrap();
        let (out, stdout) = buffer();

        let options = GlobalOptions {
            head: Some("release".to_string()),
            ..GlobalOptions::default()
        };
        run(&options, Command::Config, dir.path(), &stdout).unwrap();

        let printed = RawConfig::from_yaml(&contents(&out)).unwrap();
        assert_eq!(printed.head, "release");
        assert_eq!(printed.dirty_flag, "-dirty");
    }
}

//! CLI argument parsing for gitmeta.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::{PropertiesFormat, RawConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gitmeta: inject Git repository metadata into a build.
///
/// Each subcommand inspects the repository at `--base-dir` and either
/// publishes build properties (commit, branch, describe) or writes a
/// generated report (summary).
#[derive(Parser, Debug)]
#[command(name = "gitmeta")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for gitmeta.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish commit identity and authorship properties.
    Commit,

    /// Publish the checked-out branch name.
    ///
    /// On a detached HEAD the commit id is published instead.
    Branch,

    /// Publish the `git describe` output for the configured ref.
    Describe,

    /// Write a human-readable repository summary.
    ///
    /// The summary goes to stdout unless an output file is given.
    Summary(SummaryArgs),

    /// Print the effective configuration as YAML.
    Config,
}

/// Arguments for the `summary` command.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// File to write the summary to (parent directories are created).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Options shared by every command. Each one overrides the config file.
#[derive(Args, Debug, Default)]
pub struct GlobalOptions {
    /// Config file (default: gitmeta.yaml in the current directory, if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Working tree to inspect.
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Explicit git dir, relative to the base dir.
    #[arg(long, global = true)]
    pub git_dir: Option<PathBuf>,

    /// Ref to describe (default: HEAD).
    #[arg(long, global = true)]
    pub head: Option<String>,

    /// Suffix for dirty working trees; "false" disables it.
    #[arg(long, global = true)]
    pub dirty_flag: Option<String>,

    /// Do not count untracked files as changes.
    #[arg(long, global = true)]
    pub dirty_ignore_untracked: bool,

    /// Report failures without failing the build.
    #[arg(long, global = true)]
    pub fail_gracefully: bool,

    /// Do nothing.
    #[arg(long, global = true)]
    pub skip: bool,

    /// Do nothing when no Git repository is found.
    #[arg(long, global = true)]
    pub skip_no_git: bool,

    /// Property prefix (repeatable; replaces the configured prefixes).
    #[arg(long = "property-prefix", global = true, value_name = "PREFIX")]
    pub property_prefixes: Vec<String>,

    /// Encoding of the output file.
    #[arg(long, global = true)]
    pub encoding: Option<String>,

    /// Footer template; `%s` slots take the version and the timestamp.
    #[arg(long, global = true)]
    pub footer: Option<String>,

    /// strftime pattern for dates.
    #[arg(long, global = true)]
    pub date_format: Option<String>,

    /// Write published properties to this file instead of stdout.
    #[arg(long, global = true)]
    pub properties_file: Option<PathBuf>,

    /// Format of published properties.
    #[arg(long, global = true, value_parser = parse_properties_format)]
    pub properties_format: Option<PropertiesFormat>,
}

fn parse_properties_format(s: &str) -> Result<PropertiesFormat, String> {
    PropertiesFormat::from_str(s)
        .ok_or_else(|| format!("unknown format '{}' (expected 'properties' or 'json')", s))
}

impl GlobalOptions {
    /// Layer the options given on the command line over `config`.
    ///
    /// Boolean switches can only turn a setting on.
    pub fn apply_to(&self, config: &mut RawConfig) {
        if let Some(base_dir) = &self.base_dir {
            config.base_dir = base_dir.clone();
        }
        if let Some(git_dir) = &self.git_dir {
            config.git_dir = Some(git_dir.clone());
        }
        if let Some(head) = &self.head {
            config.head = head.clone();
        }
        if let Some(dirty_flag) = &self.dirty_flag {
            config.dirty_flag = dirty_flag.clone();
        }
        config.dirty_ignore_untracked |= self.dirty_ignore_untracked;
        config.fail_gracefully |= self.fail_gracefully;
        config.skip |= self.skip;
        config.skip_no_git |= self.skip_no_git;
        if !self.property_prefixes.is_empty() {
            config.property_prefixes = self.property_prefixes.clone();
        }
        if let Some(encoding) = &self.encoding {
            config.encoding = encoding.clone();
        }
        if let Some(footer) = &self.footer {
            config.footer = footer.clone();
        }
        if let Some(date_format) = &self.date_format {
            config.date_format = date_format.clone();
        }
        if let Some(properties_file) = &self.properties_file {
            config.properties_file = Some(properties_file.clone());
        }
        if let Some(format) = self.properties_format {
            config.properties_format = format;
        }
    }
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

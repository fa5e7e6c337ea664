//! RawConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unresolved configuration for one gitmeta invocation.
///
/// This struct represents the contents of `gitmeta.yaml` after CLI overrides
/// have been applied. Unknown fields in the YAML are ignored for forward
/// compatibility. It becomes a [`super::Configuration`] through
/// [`super::resolve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    // =========================================================================
    // Repository settings
    // =========================================================================
    /// Working tree of the repository. The git dir is discovered by walking
    /// upward from here unless `git_dir` is set.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Explicit git dir. Only set this when discovery cannot find it.
    #[serde(default)]
    pub git_dir: Option<PathBuf>,

    /// Commit or ref used as the starting point (default: "HEAD").
    #[serde(default = "default_head")]
    pub head: String,

    /// Suffix appended to refs when the working tree is dirty.
    /// `"false"` or `"null"` disable dirty flagging.
    #[serde(default = "default_dirty_flag", deserialize_with = "scalar_as_string")]
    pub dirty_flag: String,

    /// When true, untracked files do not make the working tree dirty.
    #[serde(default)]
    pub dirty_ignore_untracked: bool,

    // =========================================================================
    // Execution settings
    // =========================================================================
    /// Report failures as soft failures that let the build continue.
    #[serde(default)]
    pub fail_gracefully: bool,

    /// Skip execution entirely.
    #[serde(default)]
    pub skip: bool,

    /// Skip execution silently when no repository is found.
    #[serde(default)]
    pub skip_no_git: bool,

    // =========================================================================
    // Output settings
    // =========================================================================
    /// strftime pattern for rendered dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Prefixes each published property is stored under.
    #[serde(default = "default_property_prefixes")]
    pub property_prefixes: Vec<String>,

    /// Character encoding of file-backed output.
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Footer appended to generated output: `%s` slots for version and timestamp.
    #[serde(default = "default_footer")]
    pub footer: String,

    /// Destination for generated output (stdout when unset).
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    /// Destination for published properties (stdout when unset).
    #[serde(default)]
    pub properties_file: Option<PathBuf>,

    /// Format of emitted properties.
    #[serde(default)]
    pub properties_format: PropertiesFormat,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            git_dir: None,
            head: default_head(),
            dirty_flag: default_dirty_flag(),
            dirty_ignore_untracked: false,
            fail_gracefully: false,
            skip: false,
            skip_no_git: false,
            date_format: default_date_format(),
            property_prefixes: default_property_prefixes(),
            encoding: default_encoding(),
            footer: default_footer(),
            output_file: None,
            properties_file: None,
            properties_format: PropertiesFormat::default(),
        }
    }
}

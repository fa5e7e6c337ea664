//! Parameter resolution: RawConfig -> Configuration.

use super::model::RawConfig;
use super::types::{DIRTY_FLAG_DISABLED, PropertiesFormat};
use crate::properties::PropertyPrefixes;
use std::path::PathBuf;

/// Resolved configuration for one invocation.
///
/// Built once by [`resolve`] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub base_dir: PathBuf,
    pub git_dir: Option<PathBuf>,
    pub head: String,
    /// Absent when dirty flagging is disabled; never an empty string.
    pub dirty_flag: Option<String>,
    pub dirty_ignore_untracked: bool,
    pub fail_gracefully: bool,
    pub skip: bool,
    pub skip_no_git: bool,
    pub date_format: String,
    pub property_prefixes: PropertyPrefixes,
    pub encoding: String,
    pub footer: String,
    pub output_file: Option<PathBuf>,
    pub properties_file: Option<PathBuf>,
    pub properties_format: PropertiesFormat,
}

impl Configuration {
    /// Append the dirty flag to `value` when `dirty` is set and flagging is enabled.
    pub fn flag_dirty(&self, value: &str, dirty: bool) -> String {
        match (&self.dirty_flag, dirty) {
            (Some(flag), true) => format!("{}{}", value, flag),
            _ => value.to_string(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        resolve(RawConfig::default())
    }
}

/// Normalize a raw dirty flag: the sentinels `"false"` and `"null"` (and the
/// empty string) disable the feature, anything else is kept verbatim.
pub fn normalize_dirty_flag(flag: &str) -> Option<String> {
    if flag.is_empty() || DIRTY_FLAG_DISABLED.contains(&flag) {
        None
    } else {
        Some(flag.to_string())
    }
}

/// Resolve a raw configuration into its canonical form.
///
/// The dirty flag is the only field that is transformed.
pub fn resolve(raw: RawConfig) -> Configuration {
    Configuration {
        dirty_flag: normalize_dirty_flag(&raw.dirty_flag),
        base_dir: raw.base_dir,
        git_dir: raw.git_dir,
        head: raw.head,
        dirty_ignore_untracked: raw.dirty_ignore_untracked,
        fail_gracefully: raw.fail_gracefully,
        skip: raw.skip,
        skip_no_git: raw.skip_no_git,
        date_format: raw.date_format,
        property_prefixes: PropertyPrefixes::new(raw.property_prefixes),
        encoding: raw.encoding,
        footer: raw.footer,
        output_file: raw.output_file,
        properties_file: raw.properties_file,
        properties_format: raw.properties_format,
    }
}

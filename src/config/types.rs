//! Configuration types and defaults for gitmeta.
//!
//! This module defines enums, constants, and default value functions
//! used by the RawConfig struct.

use serde::{Deserialize, Deserializer, Serialize};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gitmeta.yaml";

/// Dirty-flag values that disable dirty flagging altogether.
pub const DIRTY_FLAG_DISABLED: [&str; 2] = ["false", "null"];

/// Format used when emitting published properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertiesFormat {
    /// `key=value` lines with Java-properties escaping (default).
    #[default]
    Properties,
    /// A flat JSON object.
    Json,
}

impl PropertiesFormat {
    /// Parse a properties format from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "properties" => Some(Self::Properties),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

// Default value functions for serde
pub fn default_date_format() -> String {
    "%m/%d/%Y %I:%M %p %z".to_string()
}
pub fn default_base_dir() -> std::path::PathBuf {
    std::path::PathBuf::from(".")
}
pub fn default_dirty_flag() -> String {
    "-dirty".to_string()
}
pub fn default_head() -> String {
    "HEAD".to_string()
}
pub fn default_property_prefixes() -> Vec<String> {
    vec!["gitmeta".to_string(), "git".to_string()]
}
pub fn default_encoding() -> String {
    "UTF-8".to_string()
}
pub fn default_footer() -> String {
    "\\nGenerated by gitmeta %s at %s".to_string()
}

/// Deserialize a YAML scalar into its string spelling.
///
/// Lets `dirty_flag: false` and `dirty_flag: ~` reach the resolver as the
/// sentinel strings `"false"` and `"null"`.
pub fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string, found {:?}",
            other
        ))),
    }
}

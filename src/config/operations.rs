//! Config loading and validation.

use super::model::RawConfig;
use super::types::DEFAULT_CONFIG_FILE;
use crate::error::{GitMetaError, Result};
use std::path::Path;
use tracing::debug;

impl RawConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    /// The result is not validated: CLI overrides still apply on top of it, and
    /// [`RawConfig::validate`] runs on the combined config.
    ///
    /// # Returns
    ///
    /// * `Ok(RawConfig)` - Successfully loaded config
    /// * `Err(GitMetaError::Config)` - Read error or parse error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            GitMetaError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::parse_yaml(&content)
    }

    /// Load the config file if one is given or `gitmeta.yaml` exists in `dir`,
    /// defaults otherwise.
    ///
    /// An explicitly given file must exist.
    pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config file");
            return Self::load(path);
        }

        let implicit = dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            debug!(path = %implicit.display(), "loading config file");
            Self::load(&implicit)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config = Self::parse_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(RawConfig::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| GitMetaError::Config(format!("failed to parse config YAML: {}", e)))
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| GitMetaError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `head` must be non-empty
    /// - `property_prefixes` must be non-empty
    /// - prefixes must be non-empty and must not start or end with a dot
    ///
    /// Paths, encodings and date formats are checked by the components that
    /// use them.
    pub fn validate(&self) -> Result<()> {
        if self.head.trim().is_empty() {
            return Err(GitMetaError::Config(
                "config validation failed: head must not be empty".to_string(),
            ));
        }

        if self.property_prefixes.is_empty() {
            return Err(GitMetaError::Config(
                "config validation failed: property_prefixes must contain at least one prefix"
                    .to_string(),
            ));
        }

        for prefix in &self.property_prefixes {
            if prefix.is_empty() {
                return Err(GitMetaError::Config(
                    "config validation failed: property_prefixes entries must be non-empty"
                        .to_string(),
                ));
            }
            if prefix.starts_with('.') || prefix.ends_with('.') {
                return Err(GitMetaError::Config(format!(
                    "config validation failed: property prefix '{}' must not start or end with '.'. Use '{}' instead.",
                    prefix,
                    prefix.trim_matches('.')
                )));
            }
        }

        Ok(())
    }
}

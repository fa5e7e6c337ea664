//! Property publishing.
//!
//! Tasks publish resolved values into a [`PropertyStore`], the key/value
//! store handed to the surrounding build. Every value is stored once per
//! configured prefix as `<prefix>.<name>`.

use crate::config::PropertiesFormat;
use crate::error::{GitMetaError, Result};
use crate::fs::atomic_write_file;
use std::collections::BTreeMap;
use std::path::Path;

/// Ordered set of property-key prefixes.
///
/// Insertion order is kept; duplicates are dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPrefixes(Vec<String>);

impl PropertyPrefixes {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for prefix in prefixes {
            let prefix = prefix.into();
            if !unique.contains(&prefix) {
                unique.push(prefix);
            }
        }
        Self(unique)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Key/value store of published properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    entries: BTreeMap<String, String>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single key, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the store as Java-style `key=value` lines, sorted by key.
    pub fn to_properties(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&escape_property(key, true));
            out.push('=');
            out.push_str(&escape_property(value, false));
            out.push('\n');
        }
        out
    }

    /// Render the store as a flat, pretty-printed JSON object.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.entries)
            .map_err(|e| GitMetaError::Config(format!("failed to serialize properties: {}", e)))
    }

    pub fn render(&self, format: PropertiesFormat) -> Result<String> {
        match format {
            PropertiesFormat::Properties => Ok(self.to_properties()),
            PropertiesFormat::Json => self.to_json().map(|json| json + "\n"),
        }
    }

    /// Atomically write the rendered store to `path`.
    pub fn write_to(&self, path: &Path, format: PropertiesFormat) -> Result<()> {
        let content = self.render(format)?;
        atomic_write_file(path, &content)
    }
}

/// Publish `value` under `name` once per prefix.
pub fn publish(store: &mut PropertyStore, name: &str, value: &str, prefixes: &PropertyPrefixes) {
    for prefix in prefixes.iter() {
        store.set(format!("{}.{}", prefix, name), value);
    }
}

fn escape_property(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_publish_once_per_prefix() {
        let mut store = PropertyStore::new();
        let prefixes = PropertyPrefixes::new(["a", "b"]);

        publish(&mut store, "version", "1.2.3", &prefixes);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a.version"), Some("1.2.3"));
        assert_eq!(store.get("b.version"), Some("1.2.3"));
    }

    #[test]
    fn test_publish_overwrites_existing_key() {
        let mut store = PropertyStore::new();
        store.set("a.branch", "old");
        let prefixes = PropertyPrefixes::new(["a"]);

        publish(&mut store, "branch", "main", &prefixes);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.branch"), Some("main"));
    }

    #[test]
    fn test_prefixes_keep_order_and_drop_duplicates() {
        let prefixes = PropertyPrefixes::new(["z", "a", "z", "m"]);
        assert_eq!(prefixes.iter().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(prefixes.len(), 3);
        assert!(!prefixes.is_empty());
    }

    #[test]
    fn test_to_properties_escapes_special_characters() {
        let mut store = PropertyStore::new();
        store.set("git.branch", "feature/x");
        store.set("git.odd key", "line1\nline2");
        store.set("git.path", "C:\\work");

        let rendered = store.to_properties();

        assert_eq!(
            rendered,
            "git.branch=feature/x\ngit.odd\\ key=line1\\nline2\ngit.path=C:\\\\work\n"
        );
    }

    #[test]
    fn test_to_json_is_flat_object() {
        let mut store = PropertyStore::new();
        store.set("git.commit.id", "abc");
        store.set("git.dirty", "false");

        let json = store.to_json().unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.get("git.commit.id").map(String::as_str), Some("abc"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_write_to_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("nested").join("git.properties");

        let mut store = PropertyStore::new();
        store.set("git.branch", "main");
        store
            .write_to(&target, PropertiesFormat::Properties)
            .unwrap();

        let content = std::fs::read_to_string(&target).unwrap();
        assert_eq!(content, "git.branch=main\n");
    }
}

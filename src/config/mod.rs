//! Configuration model for gitmeta.
//!
//! This module defines the RawConfig struct that represents `gitmeta.yaml`
//! (plus CLI overrides) and the resolved, immutable [`Configuration`] the
//! execution controller works with. YAML parsing is forward-compatible
//! (unknown fields are ignored) and every field has a default.

mod model;
mod operations;
mod resolve;
pub mod types;


// Re-export public API
pub use model::RawConfig;
pub use resolve::{Configuration, normalize_dirty_flag, resolve};
pub use types::PropertiesFormat;

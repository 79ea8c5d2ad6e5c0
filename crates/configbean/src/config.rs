//! # Configuration
//!
//! Binding policy is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables, and compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `case_insensitive_lookup` | `CONFIGBEAN_CASE_INSENSITIVE_LOOKUP` | `true` | Fall back to case-insensitive property lookup |
//! | `leaf_removal` | `CONFIGBEAN_LEAF_REMOVAL` | `"remove"` | What setting a leaf to null does: `remove` or `reject` |
//!
//! A registry copies its config into every model it builds, so changing the
//! policy only affects models built afterwards.

use crate::error::{ConfigError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens when an attribute or single leaf is set to null.
///
/// Serialized as a plain lowercase string so it reads the same from TOML,
/// env vars and compiled defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LeafRemoval {
    /// Remove the attribute or the leaf children from the document.
    #[default]
    Remove,
    /// Fail with [`ConfigError::UnsupportedOperation`].
    Reject,
}

impl TryFrom<String> for LeafRemoval {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "remove" => Ok(LeafRemoval::Remove),
            "reject" => Ok(LeafRemoval::Reject),
            other => Err(format!(
                "unknown leaf removal policy '{}' (expected 'remove' or 'reject')",
                other
            )),
        }
    }
}

impl From<LeafRemoval> for String {
    fn from(value: LeafRemoval) -> Self {
        match value {
            LeafRemoval::Remove => "remove".to_string(),
            LeafRemoval::Reject => "reject".to_string(),
        }
    }
}

/// Binding policy, stored in `configbean.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BinderConfig {
    /// Retry property lookups case-insensitively when no exact name matches.
    #[config(default = true, env = "CONFIGBEAN_CASE_INSENSITIVE_LOOKUP")]
    pub case_insensitive_lookup: bool,

    /// Behavior of setting an attribute or single leaf to null.
    #[config(default = "remove", env = "CONFIGBEAN_LEAF_REMOVAL")]
    pub leaf_removal: LeafRemoval,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            case_insensitive_lookup: true,
            leaf_removal: LeafRemoval::Remove,
        }
    }
}

impl BinderConfig {
    /// Load config from environment variables and the given TOML file,
    /// falling back to compiled defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder()
            .env()
            .file(path.as_ref())
            .load()
            .map_err(|e| ConfigError::Config(e.to_string()))
    }

    /// Whether a null leaf set should remove the value.
    pub fn removes_null_leaves(&self) -> bool {
        self.leaf_removal == LeafRemoval::Remove
    }
}

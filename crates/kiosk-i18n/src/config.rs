//! Translator configuration.
//!
//! ```toml
//! log_missing_keys = true
//! use_fallback = true
//!
//! [missing_key_policy]
//! mode = "placeholder"
//! text = "???"
//! ```
//!
//! Every field has a default, so an empty document yields
//! [`TranslatorConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

/// What [`Translator::translate`](crate::Translator::translate) renders
/// when a key resolves in neither the active nor the fallback resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Render the key path itself, e.g. `auth.sign_in.title`.
    #[default]
    ShowPath,
    /// Render a fixed string.
    Placeholder { text: String },
}

/// Tunables for a [`Translator`](crate::Translator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub missing_key_policy: MissingKeyPolicy,
    /// Emit a `warn` event for every miss.
    pub log_missing_keys: bool,
    /// Consult the fallback resource before applying the policy.
    pub use_fallback: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            missing_key_policy: MissingKeyPolicy::ShowPath,
            log_missing_keys: true,
            use_fallback: true,
        }
    }
}

/// Errors from loading a [`TranslatorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranslatorConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Replace the missing-key policy.
    #[must_use]
    pub fn missing_key_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_key_policy = policy;
        self
    }

    #[must_use]
    pub fn log_missing_keys(mut self, enabled: bool) -> Self {
        self.log_missing_keys = enabled;
        self
    }

    #[must_use]
    pub fn use_fallback(mut self, enabled: bool) -> Self {
        self.use_fallback = enabled;
        self
    }
}

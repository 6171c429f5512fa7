//! Error types for resource loading and key lookup.

use std::path::PathBuf;

/// A key path did not end at a string leaf.
///
/// Raised when a segment is missing, when a leaf is reached while segments
/// remain, or when the path stops at a section instead of a leaf.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("translation key not found: `{path}`")]
pub struct KeyNotFound {
    /// The path exactly as it was looked up.
    pub path: String,
}

impl KeyNotFound {
    /// Failure for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Errors from turning JSON into a [`NestedResource`](crate::NestedResource).
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Failure reading a locale file.
    #[error("failed to read resource file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("invalid resource JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is neither a string nor an object.
    #[error("unsupported {kind} value at `{path}`; expected a string or an object")]
    UnsupportedValue { path: String, kind: &'static str },

    /// A key is empty or contains the path separator.
    #[error("invalid key `{key}` under `{parent}`; keys must be non-empty and contain no `.`")]
    InvalidKey { parent: String, key: String },
}

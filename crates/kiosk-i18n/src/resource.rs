//! Run-time model of a nested localization resource.
//!
//! A [`NestedResource`] is either a display string (a leaf) or a section
//! mapping keys to further resources. Keys are unique per section, never
//! empty, and never contain [`SEPARATOR`], so every leaf has exactly one
//! path and every path names at most one node.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{KeyNotFound, ResourceError};

/// Joins the segments of a key path.
pub const SEPARATOR: char = '.';

/// A tree of localized strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NestedResource {
    /// A display string.
    Leaf(String),
    /// A section of named children.
    Node(BTreeMap<String, NestedResource>),
}

impl NestedResource {
    /// Parse a resource from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ResourceError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Read and parse a locale file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Convert already parsed JSON.
    ///
    /// Strings become leaves and objects become sections. Any other JSON
    /// value, and any key that is empty or contains the separator, is
    /// rejected with the path where it was found.
    pub fn from_json_value(value: &Value) -> Result<Self, ResourceError> {
        convert(value, "")
    }

    /// Whether this node is a display string.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The set of every path from this node to a leaf.
    ///
    /// A leaf contributes the empty suffix; a section contributes `K` for
    /// each child `K` whose suffix is empty and `K.S` for each non-empty
    /// suffix `S`. The empty string is never returned, so a bare leaf has
    /// no paths.
    #[must_use]
    pub fn key_paths(&self) -> BTreeSet<String> {
        let mut paths: BTreeSet<String> = self.suffixes().into_iter().collect();
        paths.remove("");
        paths
    }

    fn suffixes(&self) -> Vec<String> {
        match self {
            Self::Leaf(_) => vec![String::new()],
            Self::Node(children) => children
                .iter()
                .flat_map(|(key, child)| {
                    child.suffixes().into_iter().map(move |suffix| {
                        if suffix.is_empty() {
                            key.clone()
                        } else {
                            format!("{key}{SEPARATOR}{suffix}")
                        }
                    })
                })
                .collect(),
        }
    }

    /// Look up the string at `path`.
    pub fn resolve(&self, path: &str) -> Result<&str, KeyNotFound> {
        match self.node(path) {
            Some(Self::Leaf(text)) => Ok(text.as_str()),
            _ => Err(KeyNotFound::new(path)),
        }
    }

    /// The subtree at `path`, leaf or section.
    #[must_use]
    pub fn section(&self, path: &str) -> Option<&NestedResource> {
        self.node(path)
    }

    /// Every leaf keyed by its path.
    #[must_use]
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        flatten_into(self, String::new(), &mut out);
        out
    }

    fn node(&self, path: &str) -> Option<&NestedResource> {
        let mut node = self;
        for segment in path.split(SEPARATOR) {
            match node {
                Self::Node(children) => node = children.get(segment)?,
                Self::Leaf(_) => return None,
            }
        }
        Some(node)
    }
}

/// Look up the string at `path` in `resource`.
pub fn resolve<'a>(resource: &'a NestedResource, path: &str) -> Result<&'a str, KeyNotFound> {
    resource.resolve(path)
}

impl<'de> Deserialize<'de> for NestedResource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json_value(&value).map_err(serde::de::Error::custom)
    }
}

impl From<&str> for NestedResource {
    fn from(text: &str) -> Self {
        Self::Leaf(text.to_string())
    }
}

fn convert(value: &Value, path: &str) -> Result<NestedResource, ResourceError> {
    match value {
        Value::String(text) => Ok(NestedResource::Leaf(text.clone())),
        Value::Object(map) => {
            let mut children = BTreeMap::new();
            for (key, child) in map {
                if key.is_empty() || key.contains(SEPARATOR) {
                    return Err(ResourceError::InvalidKey {
                        parent: path.to_string(),
                        key: key.clone(),
                    });
                }
                let child_path = join(path, key);
                children.insert(key.clone(), convert(child, &child_path)?);
            }
            Ok(NestedResource::Node(children))
        }
        other => Err(ResourceError::UnsupportedValue {
            path: path.to_string(),
            kind: json_kind(other),
        }),
    }
}

fn flatten_into(node: &NestedResource, prefix: String, out: &mut BTreeMap<String, String>) {
    match node {
        NestedResource::Leaf(text) => {
            if !prefix.is_empty() {
                out.insert(prefix, text.clone());
            }
        }
        NestedResource::Node(children) => {
            for (key, child) in children {
                flatten_into(child, join(&prefix, key), out);
            }
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{key}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

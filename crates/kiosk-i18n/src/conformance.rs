//! Drift detection between a declared shape and a loaded resource.
//!
//! Locale files are edited independently, so a key present in one locale
//! can be missing from another. [`conformance`] compares the statically
//! derived key set of a shape with the paths a resource actually provides.

use std::collections::BTreeSet;

use crate::keys::ResourceShape;
use crate::resource::NestedResource;

/// Result of checking a resource against a shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConformanceReport {
    /// Declared paths that do not resolve in the resource.
    pub missing: Vec<String>,
    /// Leaf paths in the resource that the shape does not declare.
    pub undeclared: Vec<String>,
    /// Number of declared paths checked.
    pub declared: usize,
}

impl ConformanceReport {
    /// No missing and no undeclared paths.
    #[must_use]
    pub fn is_conforming(&self) -> bool {
        self.missing.is_empty() && self.undeclared.is_empty()
    }

    /// Percentage of declared paths that resolve (100 for an empty shape).
    #[must_use]
    pub fn coverage_percent(&self) -> f64 {
        if self.declared == 0 {
            return 100.0;
        }
        let present = self.declared - self.missing.len();
        (present as f64 / self.declared as f64) * 100.0
    }
}

/// Compare the declared paths of `R` with the leaves of `resource`.
pub fn conformance<R: ResourceShape>(resource: &NestedResource) -> ConformanceReport {
    let declared: BTreeSet<&'static str> = R::key_paths().iter().map(|k| k.as_str()).collect();
    let provided = resource.key_paths();

    let missing = declared
        .iter()
        .filter(|path| !provided.contains(**path))
        .map(|path| (*path).to_string())
        .collect();
    let undeclared = provided
        .iter()
        .filter(|path| !declared.contains(path.as_str()))
        .cloned()
        .collect();

    ConformanceReport {
        missing,
        undeclared,
        declared: declared.len(),
    }
}

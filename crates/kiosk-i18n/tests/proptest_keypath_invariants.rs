//! Property-based invariant tests for key path derivation and lookup.
//!
//! 1. Every derived path resolves to a leaf
//! 2. A path resolves if and only if it is in the derived set
//! 3. Derived paths never carry empty segments or stray separators
//! 4. Derived paths and flattened leaves agree
//! 5. Reloading serialized JSON preserves the derived set
//! 6. Interpolation with no placeholders is identity
//! 7. Interpolation is single-pass
//! 8. Missing args leave placeholder tokens intact
//! 9. Any instance of a declared shape conforms and resolves its keys

use std::collections::BTreeSet;

use kiosk_i18n::{NestedResource, conformance, interpolate, key_paths, resolve};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn resource() -> impl Strategy<Value = NestedResource> {
    let leaf = "[a-zA-Z ]{0,8}".prop_map(NestedResource::Leaf);
    leaf.prop_recursive(4, 64, 5, |inner| {
        proptest::collection::btree_map("[a-z]{1,3}", inner, 0..5).prop_map(NestedResource::Node)
    })
}

/// Derived paths, every proper prefix of them, extensions past a leaf, and
/// noise. Covers both sides of the resolve/derive equivalence.
fn candidates(derived: &BTreeSet<String>, noise: &[String]) -> BTreeSet<String> {
    let mut out: BTreeSet<String> = noise.iter().cloned().collect();
    for path in derived {
        out.insert(path.clone());
        out.insert(format!("{path}.x"));
        out.insert(format!("{path}."));
        let mut prefix = String::new();
        for segment in path.split('.') {
            if !prefix.is_empty() {
                out.insert(prefix.clone());
                prefix.push('.');
            }
            prefix.push_str(segment);
        }
    }
    out.insert(String::new());
    out
}

key_paths! {
    Example in example {
        a: { b, c },
        d,
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Every derived path resolves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn derived_paths_resolve(tree in resource()) {
        for path in tree.key_paths() {
            prop_assert!(tree.resolve(&path).is_ok(), "derived path {:?} did not resolve", path);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Resolve succeeds exactly on the derived set
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolve_agrees_with_derivation(
        tree in resource(),
        noise in proptest::collection::vec("[a-z.]{0,8}", 0..16),
    ) {
        let derived = tree.key_paths();
        for candidate in candidates(&derived, &noise) {
            prop_assert_eq!(
                resolve(&tree, &candidate).is_ok(),
                derived.contains(&candidate),
                "disagreement on {:?}", candidate
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Path syntax
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn derived_paths_are_well_formed(tree in resource()) {
        for path in tree.key_paths() {
            prop_assert!(!path.is_empty());
            prop_assert!(!path.starts_with('.'), "leading separator in {:?}", path);
            prop_assert!(!path.ends_with('.'), "trailing separator in {:?}", path);
            prop_assert!(!path.contains(".."), "empty segment in {:?}", path);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Flatten agrees
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flatten_keys_equal_derived(tree in resource()) {
        let flat: BTreeSet<String> = tree.flatten().into_keys().collect();
        prop_assert_eq!(flat, tree.key_paths());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. JSON loading preserves the derived set
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn json_reload_preserves_paths(tree in resource()) {
        let json = serde_json::to_string(&tree).unwrap();
        let reloaded = NestedResource::from_json_str(&json).unwrap();
        prop_assert_eq!(reloaded.key_paths(), tree.key_paths());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6-8. Interpolation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_placeholders_is_identity(text in "[^{}]{0,40}", value in "[a-z]{0,5}") {
        prop_assert_eq!(interpolate(&text, &[("name", value.as_str())]), text.as_str());
    }
}

proptest! {
    #[test]
    fn interpolation_is_single_pass(value in "\\{[a-z]{1,4}\\}") {
        let out = interpolate("{outer}", &[("outer", value.as_str()), ("inner", "x")]);
        prop_assert_eq!(out, value.as_str());
    }
}

proptest! {
    #[test]
    fn missing_args_keep_tokens(name in "[a-z]{1,8}") {
        let template = format!("before {{{name}}} after");
        prop_assert_eq!(interpolate(&template, &[]), template.as_str());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Declared shape against generated instances
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn conforming_instance_resolves_every_declared_key(
        b in "[a-z]{0,6}", c in "[a-z]{0,6}", d in "[a-z]{0,6}",
    ) {
        let json = serde_json::json!({ "a": { "b": &b, "c": &c }, "d": &d });
        let tree = NestedResource::from_json_value(&json).unwrap();
        let report = conformance::<Example>(&tree);
        prop_assert!(report.is_conforming());
        prop_assert_eq!(tree.resolve(example::a::b.as_str()).unwrap(), b.as_str());
        prop_assert_eq!(tree.resolve(example::d.as_str()).unwrap(), d.as_str());
    }
}

#[test]
fn worked_example() {
    let tree =
        NestedResource::from_json_str(r#"{"a": {"b": "hello", "c": "world"}, "d": "x"}"#).unwrap();
    let derived: Vec<String> = tree.key_paths().into_iter().collect();
    assert_eq!(derived, ["a.b", "a.c", "d"]);
    assert_eq!(resolve(&tree, "a.b"), Ok("hello"));
    assert!(resolve(&tree, "a").is_err());
    assert!(resolve(&tree, "a.z").is_err());
}

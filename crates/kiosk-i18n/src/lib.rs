#![forbid(unsafe_code)]

//! Localization resources with key paths checked against the resource shape.
//!
//! A localization resource is a tree of string leaves grouped under named
//! sections ([`NestedResource`]). A leaf is addressed by a dot-joined
//! [`KeyPath`], e.g. `auth.sign_in.title`.
//!
//! Paths are derived twice, and both derivations agree:
//!
//! - At compile time, [`key_paths!`] declares the shape once and emits a
//!   module tree of typed `KeyPath` constants. A lookup through
//!   [`Translator`] only accepts those constants, so an unknown key is a
//!   compile error rather than a blank label.
//! - At run time, [`NestedResource::key_paths`] walks a loaded resource and
//!   [`NestedResource::resolve`] looks a path up. A path resolves exactly
//!   when it is in the derived set.
//!
//! When a locale file drifts from the declared shape, [`conformance`]
//! reports the difference and [`Translator::translate`] falls back instead
//! of rendering nothing.
//!
//! # How it fits in the system
//! Loading locale files is left to the host; this crate only needs the
//! parsed JSON. It does not depend on the state crate.

pub mod config;
pub mod conformance;
pub mod error;
pub mod interpolate;
pub mod keys;
pub mod resource;
pub mod translator;

pub use config::{ConfigError, MissingKeyPolicy, TranslatorConfig};
pub use conformance::{ConformanceReport, conformance};
pub use error::{KeyNotFound, ResourceError};
pub use interpolate::interpolate;
pub use keys::{KeyPath, ResourceShape};
pub use resource::{NestedResource, SEPARATOR, resolve};
pub use translator::Translator;

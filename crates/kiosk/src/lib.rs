#![forbid(unsafe_code)]

//! Kiosk public facade crate.
//!
//! Re-exports the state and localization crates and offers a small
//! prelude. The two halves are independent; an app typically owns one
//! [`StateRegistry`] and one [`Translator`] per active locale and hands
//! both to its screens.

use std::fmt;

// --- State re-exports -----------------------------------------------------

pub use kiosk_state::{AppState, RegistryError, StateRegistry, Subscription};

// --- Localization re-exports ----------------------------------------------

pub use kiosk_i18n::{
    ConfigError, ConformanceReport, KeyNotFound, KeyPath, MissingKeyPolicy, NestedResource,
    ResourceError, ResourceShape, Translator, TranslatorConfig, conformance, interpolate, key_paths,
    resolve,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for kiosk apps.
#[derive(Debug)]
pub enum Error {
    /// A state slot could not be created or looked up.
    Registry(RegistryError),
    /// A locale resource failed to load.
    Resource(ResourceError),
    /// Translator configuration failed to load.
    Config(ConfigError),
    /// A key did not resolve in a strict lookup.
    KeyNotFound(KeyNotFound),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Resource(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::KeyNotFound(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Resource(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::KeyNotFound(err) => Some(err),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<ResourceError> for Error {
    fn from(err: ResourceError) -> Self {
        Self::Resource(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<KeyNotFound> for Error {
    fn from(err: KeyNotFound) -> Self {
        Self::KeyNotFound(err)
    }
}

/// Standard result type for kiosk APIs.
pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    //! Common imports for kiosk apps.

    pub use crate::{
        AppState, Error, KeyPath, NestedResource, ResourceShape, Result, StateRegistry,
        Subscription, Translator, TranslatorConfig, key_paths,
    };
}

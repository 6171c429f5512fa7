#![forbid(unsafe_code)]

//! Process-wide owner of named state slots.
//!
//! A [`StateRegistry`] is constructed once at startup and passed to the
//! views that need shared state. Each concern ("current user", "current
//! profile", ...) gets exactly one slot, created lazily on first access
//! with an absent value. Registration order is recorded so the
//! initialization sequence can be inspected.
//!
//! ```
//! use kiosk_state::StateRegistry;
//!
//! #[derive(Clone)]
//! struct Identity { uid: String }
//!
//! let registry = StateRegistry::new();
//! let identity = registry.slot::<Identity>("identity").unwrap();
//! identity.replace(Identity { uid: "u-1".into() });
//!
//! let again = registry.slot::<Identity>("identity").unwrap();
//! assert_eq!(again.get().map(|i| i.uid), Some("u-1".to_string()));
//! ```

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::fmt;

use tracing::debug;

use crate::state::AppState;

/// Errors from slot lookup and registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The name is already bound to a slot of another value type.
    #[error("state slot `{name}` holds `{registered}`, not `{requested}`")]
    TypeMismatch {
        name: &'static str,
        registered: &'static str,
        requested: &'static str,
    },

    /// [`StateRegistry::register`] was called twice for the same name.
    #[error("state slot `{name}` is already registered")]
    AlreadyRegistered { name: &'static str },
}

struct Entry {
    name: &'static str,
    type_name: &'static str,
    /// Boxed `AppState<T>` handle; downcast on lookup.
    handle: Box<dyn Any>,
}

/// Registry of named [`AppState`] slots.
///
/// The registry owns one handle per slot; callers receive clones that
/// share the same storage.
#[derive(Default)]
pub struct StateRegistry {
    entries: RefCell<Vec<Entry>>,
}

impl StateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the slot called `name`, creating it absent on first use.
    pub fn slot<T: Clone + 'static>(&self, name: &'static str) -> Result<AppState<T>, RegistryError> {
        if let Some(existing) = self.lookup::<T>(name) {
            return existing;
        }
        Ok(self.insert(name, None))
    }

    /// Create the slot called `name` holding `initial`.
    ///
    /// Unlike [`slot`](Self::slot) this refuses to hand back an existing
    /// slot, so startup code can assert that it initializes each concern once.
    pub fn register<T: Clone + 'static>(
        &self,
        name: &'static str,
        initial: Option<T>,
    ) -> Result<AppState<T>, RegistryError> {
        if self.contains(name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }
        Ok(self.insert(name, initial))
    }

    /// Whether a slot called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().iter().any(|e| e.name == name)
    }

    /// Slot names in the order they were created.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.borrow().iter().map(|e| e.name).collect()
    }

    /// Number of slots created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no slot has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn lookup<T: Clone + 'static>(
        &self,
        name: &'static str,
    ) -> Option<Result<AppState<T>, RegistryError>> {
        let entries = self.entries.borrow();
        let entry = entries.iter().find(|e| e.name == name)?;
        Some(
            entry
                .handle
                .downcast_ref::<AppState<T>>()
                .cloned()
                .ok_or(RegistryError::TypeMismatch {
                    name,
                    registered: entry.type_name,
                    requested: type_name::<T>(),
                }),
        )
    }

    fn insert<T: Clone + 'static>(&self, name: &'static str, initial: Option<T>) -> AppState<T> {
        let state = AppState::from_parts(name, initial);
        let mut entries = self.entries.borrow_mut();
        entries.push(Entry {
            name,
            type_name: type_name::<T>(),
            handle: Box::new(state.clone()),
        });
        debug!(
            slot = name,
            value_type = type_name::<T>(),
            position = entries.len(),
            "state slot registered"
        );
        state
    }
}

impl fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        f.debug_map()
            .entries(entries.iter().map(|e| (e.name, e.type_name)))
            .finish()
    }
}

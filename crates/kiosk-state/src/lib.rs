#![forbid(unsafe_code)]

//! Shared application state for kiosk apps.
//!
//! Provides [`AppState<T>`], a single typed slot that screens read on
//! render and write in response to events, and [`StateRegistry`], the
//! explicitly constructed owner of every slot in the process.
//!
//! # How it fits in the system
//! Views never keep their own authoritative copy of shared data. They hold
//! an [`AppState`] handle, call [`AppState::get`] when they need the value,
//! and either [`subscribe`](AppState::subscribe) for change notification or
//! compare [`version`](AppState::version) numbers when polling on render.

pub mod registry;
pub mod state;

pub use registry::{RegistryError, StateRegistry};
pub use state::{AppState, Subscription};

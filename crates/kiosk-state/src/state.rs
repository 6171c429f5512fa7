#![forbid(unsafe_code)]

//! Single-slot observable state with synchronous change notification.
//!
//! # Design
//!
//! [`AppState<T>`] holds an `Option<T>` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). `None` is the absent value: a fresh slot
//! starts absent and setting it back to `None` is the supported way to
//! reset a concern (for example on sign-out).
//!
//! Every write replaces the value unconditionally, bumps the version and
//! then notifies all live observers in registration order, each with the
//! value that was just written. The internal borrow is released before any
//! observer runs, so observers may call back into the same slot.
//!
//! A write made from inside an observer is stored at once, but its
//! notification is queued behind the round in progress. The outermost
//! write drains the queue in FIFO order, so every observer sees writes in
//! call order and the last value it sees is the one `get()` returns.
//!
//! # Performance
//!
//! | Operation     | Complexity                 |
//! |---------------|----------------------------|
//! | `get()`       | O(1) + clone of `T`        |
//! | `set()`       | O(S) where S = observers   |
//! | `subscribe()` | O(1) amortized             |
//!
//! # Failure Modes
//!
//! - **Re-entrant update**: calling any slot method from inside the
//!   closure passed to [`AppState::update`] panics (`RefCell` borrow
//!   rules). Observers are not affected; they run after the borrow ends.
//! - **Observer leak**: a [`Subscription`] kept forever keeps its callback
//!   alive. Dead entries are pruned lazily on the next notification.
//! - **Observer panic**: the panic propagates out of the write. Queued
//!   notifications from that round are discarded; the stored value and
//!   later writes are unaffected.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, info_span};
use web_time::Instant;

/// Label used in traces for slots created outside a registry.
const ANONYMOUS_SLOT: &str = "anonymous";

type ObserverRc<T> = Rc<dyn Fn(Option<&T>)>;
type ObserverWeak<T> = Weak<dyn Fn(Option<&T>)>;

struct Slot<T> {
    name: &'static str,
    value: Option<T>,
    version: u64,
    /// Observers stored as weak references. Dead entries are pruned on notify.
    observers: Vec<ObserverWeak<T>>,
    /// Written values (with their version) not yet delivered.
    pending: VecDeque<(Option<T>, u64)>,
    /// Set while a notification round is running on this slot.
    draining: bool,
}

/// A shared, versioned slot holding `T` or nothing.
///
/// Cloning an `AppState` creates a new handle to the **same** slot: both
/// handles see the same value and share observers.
///
/// # Invariants
///
/// 1. After `set(v)` returns, `get()` on any handle yields `v`.
/// 2. `version` increments by exactly 1 on every write, including writes
///    of an equal value.
/// 3. Each write notifies every live observer exactly once, in
///    registration order, with the written value. Writes are delivered in
///    call order, including writes made by an observer.
/// 4. An observer whose [`Subscription`] was released is never called again.
pub struct AppState<T> {
    inner: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AppState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.borrow();
        f.debug_struct("AppState")
            .field("name", &slot.name)
            .field("value", &slot.value)
            .field("version", &slot.version)
            .field("observer_count", &slot.observers.len())
            .finish()
    }
}

impl<T: Clone + 'static> Default for AppState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> AppState<T> {
    /// Create an absent slot with version 0 and no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(ANONYMOUS_SLOT, None)
    }

    /// Create an absent slot carrying `name` in its trace spans.
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self::from_parts(name, None)
    }

    /// Create a slot that already holds `value`. The version starts at 0.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        Self::from_parts(ANONYMOUS_SLOT, Some(value))
    }

    pub(crate) fn from_parts(name: &'static str, value: Option<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slot {
                name,
                value,
                version: 0,
                observers: Vec::new(),
                pending: VecDeque::new(),
                draining: false,
            })),
        }
    }

    /// Name of the slot as registered, or `"anonymous"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.borrow().name
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.borrow().value.as_ref())
    }

    /// Whether the slot currently holds a value.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner.borrow().value.is_some()
    }

    /// Replace the held value and notify observers.
    ///
    /// No comparison against the previous value is made: writing an equal
    /// value still bumps the version and still notifies.
    pub fn set(&self, value: Option<T>) {
        let previous = {
            let mut slot = self.inner.borrow_mut();
            slot.version += 1;
            std::mem::replace(&mut slot.value, value)
        };
        // Dropped outside the borrow so a `Drop` impl may read the slot.
        drop(previous);
        self.notify();
    }

    /// Store `value`. Shorthand for `set(Some(value))`.
    pub fn replace(&self, value: T) {
        self.set(Some(value));
    }

    /// Reset the slot to absent. Shorthand for `set(None)`.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Reset the slot to absent and hand back what it held.
    ///
    /// Counts as a write: the version is bumped and observers see `None`.
    pub fn take(&self) -> Option<T> {
        let previous = {
            let mut slot = self.inner.borrow_mut();
            slot.version += 1;
            slot.value.take()
        };
        self.notify();
        previous
    }

    /// Modify the value in place. Always counts as one write.
    pub fn update(&self, f: impl FnOnce(&mut Option<T>)) {
        {
            let mut slot = self.inner.borrow_mut();
            f(&mut slot.value);
            slot.version += 1;
        }
        self.notify();
    }

    /// Register `observer` to be called with the new value after every write.
    ///
    /// The returned [`Subscription`] keeps the observer registered. Call
    /// [`Subscription::unsubscribe`] or drop it to stop notifications.
    pub fn subscribe(&self, observer: impl Fn(Option<&T>) + 'static) -> Subscription {
        let strong: ObserverRc<T> = Rc::new(observer);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().observers.push(weak);
        Subscription {
            guard: Some(Box::new(strong)),
        }
    }

    /// Number of writes applied so far. Compare across renders to detect
    /// changes without subscribing.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of observers that are still subscribed.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner
            .borrow()
            .observers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Queue the current value for delivery and, unless a round is already
    /// running, drain the queue.
    fn notify(&self) {
        {
            let mut slot = self.inner.borrow_mut();
            slot.observers.retain(|w| w.strong_count() > 0);
            if slot.observers.is_empty() && !slot.draining {
                return;
            }
            let entry = (slot.value.clone(), slot.version);
            slot.pending.push_back(entry);
            if slot.draining {
                return;
            }
            slot.draining = true;
        }

        let _drain = DrainGuard(&self.inner);
        loop {
            let (value, version, observers, name) = {
                let mut slot = self.inner.borrow_mut();
                let Some((value, version)) = slot.pending.pop_front() else {
                    break;
                };
                let observers: Vec<ObserverRc<T>> =
                    slot.observers.iter().filter_map(|w| w.upgrade()).collect();
                (value, version, observers, slot.name)
            };
            if !observers.is_empty() {
                deliver(name, version, value.as_ref(), &observers);
            }
        }
    }
}

/// Run one notification round for a single write.
fn deliver<T>(name: &'static str, version: u64, value: Option<&T>, observers: &[ObserverRc<T>]) {
    let observer_count = observers.len() as u64;
    let started = Instant::now();
    let span = info_span!(
        "state.notify",
        slot = name,
        observers = observer_count,
        version,
        duration_us = tracing::field::Empty
    );
    let _entered = span.enter();

    for observer in observers {
        observer(value);
    }

    let duration_us = started.elapsed().as_micros() as u64;
    span.record("duration_us", duration_us);
    debug!(
        slot = name,
        version,
        observers = observer_count,
        duration_us,
        "state change propagated"
    );
}

/// Ends a drain even when an observer panics, so the slot keeps notifying.
struct DrainGuard<'a, T>(&'a RefCell<Slot<T>>);

impl<T> Drop for DrainGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.0.try_borrow_mut() {
            slot.draining = false;
            slot.pending.clear();
        }
    }
}

/// Registration handle for an observer.
///
/// Releasing the handle, either through [`unsubscribe`](Self::unsubscribe)
/// or by dropping it, drops the strong reference to the callback so the
/// slot's weak entry no longer upgrades.
pub struct Subscription {
    /// Type-erased strong reference keeping the observer `Rc` alive.
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    /// Stop receiving notifications. Calling this again is a no-op.
    pub fn unsubscribe(&mut self) {
        self.guard = None;
    }

    /// Whether the observer is still registered through this handle.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

//! Statically checked key paths.
//!
//! [`key_paths!`](crate::key_paths) declares the shape of a resource once.
//! Every section becomes a module and every leaf a [`KeyPath`] constant
//! whose value is the dot-joined path from the root, so
//! `messages::auth::sign_in::title` is the key `"auth.sign_in.title"`. A
//! typo is an unresolved name at compile time.
//!
//! ```
//! use kiosk_i18n::{key_paths, ResourceShape};
//!
//! key_paths! {
//!     /// Strings shown by the sign-in flow.
//!     pub Messages in messages {
//!         a: { b, c },
//!         d,
//!     }
//! }
//!
//! fn main() {
//!     assert_eq!(messages::a::b.as_str(), "a.b");
//!     let all: Vec<&str> = Messages::key_paths().iter().map(|k| k.as_str()).collect();
//!     assert_eq!(all, ["a.b", "a.c", "d"]);
//! }
//! ```
//!
//! Segments must be plain Rust identifiers, unique within their section.
//! A name used twice in one section, even once as a leaf and once as a
//! section, does not compile. The derived set is listed in declaration
//! order; callers should not rely on that order.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::resource::SEPARATOR;

/// A path to one leaf of resources shaped like `R`.
///
/// Values only come from [`key_paths!`](crate::key_paths) or
/// [`ResourceShape::lookup`], so holding a `KeyPath<R>` proves the path is
/// in the derived set for `R`.
pub struct KeyPath<R> {
    path: &'static str,
    shape: PhantomData<fn() -> R>,
}

impl<R> KeyPath<R> {
    #[doc(hidden)]
    pub const fn __declared(path: &'static str) -> Self {
        Self {
            path,
            shape: PhantomData,
        }
    }

    /// The dot-joined path.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.path
    }

    /// The path split on the separator, root first.
    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split(SEPARATOR)
    }

    /// Number of segments (1 for a top-level leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }
}

impl<R> Clone for KeyPath<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for KeyPath<R> {}

impl<R> PartialEq for KeyPath<R> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<R> Eq for KeyPath<R> {}

impl<R> Hash for KeyPath<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl<R> fmt::Debug for KeyPath<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyPath").field(&self.path).finish()
    }
}

impl<R> fmt::Display for KeyPath<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl<R> AsRef<str> for KeyPath<R> {
    fn as_ref(&self) -> &str {
        self.path
    }
}

/// A resource shape with a closed set of leaf paths.
///
/// Implemented by the marker types that [`key_paths!`](crate::key_paths)
/// generates.
pub trait ResourceShape: Sized + 'static {
    /// Every valid path for this shape. Built once per shape.
    fn key_paths() -> &'static [KeyPath<Self>];

    /// Whether `path` is in the derived set.
    fn contains(path: &str) -> bool {
        Self::lookup(path).is_some()
    }

    /// Promote a run-time string to a typed key when it is declared.
    fn lookup(path: &str) -> Option<KeyPath<Self>> {
        Self::key_paths().iter().copied().find(|key| key.as_str() == path)
    }
}

/// Declare a resource shape and its key constants.
///
/// `key_paths! { pub Shape in module { ... } }` emits a unit struct
/// `Shape` implementing [`ResourceShape`] and a module `module` holding one
/// `KeyPath<Shape>` constant per leaf. A section is written `name: { ... }`
/// and becomes a nested module; a leaf is a bare `name`.
///
/// A name cannot be both a leaf and a section of the same parent:
///
/// ```compile_fail
/// use kiosk_i18n::key_paths;
///
/// key_paths! {
///     Clash in clash {
///         a: { b },
///         a,
///     }
/// }
///
/// fn main() {}
/// ```
#[macro_export]
macro_rules! key_paths {
    (@level [$($prefix:ident)*] $($body:tt)*) => {
        $crate::key_paths!(@items [$($prefix)*] $($body)*);

        #[allow(unused_variables)]
        pub(super) fn __collect(out: &mut ::std::vec::Vec<$crate::KeyPath<__Shape>>) {
            $crate::key_paths!(@collect out; $($body)*);
        }
    };

    (@items [$($prefix:ident)*]) => {};
    (@items [$($prefix:ident)*] $node:ident : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        pub mod $node {
            #[allow(unused_imports)]
            use super::__Shape;

            $crate::key_paths!(@level [$($prefix)* $node] $($inner)*);
        }

        $crate::key_paths!(@items [$($prefix)*] $($($rest)*)?);
    };
    (@items [$($prefix:ident)*] $leaf:ident $(, $($rest:tt)*)?) => {
        // Claims the name in the type namespace so a section of the same
        // name is a duplicate definition.
        #[doc(hidden)]
        pub mod $leaf {}

        pub const $leaf: $crate::KeyPath<__Shape> = $crate::KeyPath::__declared(
            concat!($(stringify!($prefix), ".",)* stringify!($leaf))
        );

        $crate::key_paths!(@items [$($prefix)*] $($($rest)*)?);
    };

    (@collect $out:ident;) => {};
    (@collect $out:ident; $node:ident : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $node::__collect($out);
        $crate::key_paths!(@collect $out; $($($rest)*)?);
    };
    (@collect $out:ident; $leaf:ident $(, $($rest:tt)*)?) => {
        $out.push($leaf);
        $crate::key_paths!(@collect $out; $($($rest)*)?);
    };

    (
        $(#[$meta:meta])*
        $vis:vis $shape:ident in $module:ident { $($body:tt)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $shape;

        impl $crate::ResourceShape for $shape {
            fn key_paths() -> &'static [$crate::KeyPath<Self>] {
                static PATHS: ::std::sync::OnceLock<::std::vec::Vec<$crate::KeyPath<$shape>>> =
                    ::std::sync::OnceLock::new();
                PATHS.get_or_init(|| {
                    let mut out = ::std::vec::Vec::new();
                    $module::__collect(&mut out);
                    out
                })
            }
        }

        #[allow(non_snake_case, non_upper_case_globals, dead_code)]
        $vis mod $module {
            #[allow(unused_imports)]
            use super::$shape as __Shape;

            $crate::key_paths!(@level [] $($body)*);
        }
    };
}

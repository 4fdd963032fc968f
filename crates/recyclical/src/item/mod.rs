//! Item types, definitions and the registry that maps them to view kinds.
//!
//! A list holds items of a single Rust type `T`. Lists that display several
//! kinds of rows use an enum and report a distinct [`TypeKey`] per variant:
//!
//! ```
//! use recyclical::item::{ListItem, TypeKey};
//!
//! #[derive(Clone, PartialEq)]
//! enum Row {
//!     Header(String),
//!     Person { name: String, age: u32 },
//! }
//!
//! impl ListItem for Row {
//!     fn type_key(&self) -> TypeKey {
//!         match self {
//!             Row::Header(_) => TypeKey::new("Header"),
//!             Row::Person { .. } => TypeKey::new("Person"),
//!         }
//!     }
//! }
//! ```

mod definition;
mod registry;

use std::borrow::Cow;
use std::fmt;

pub use definition::{ItemDefinition, ItemHandler};
pub use registry::ItemRegistry;

/// Stable key identifying one model type within a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    /// Create a key from an explicit name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The key for a Rust type, derived from its type name.
    pub fn of<M: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<M>()))
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeKey {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

/// Integer identifier grouping rows that share a layout and bind behavior.
///
/// View kinds are positive and assigned by [`ItemRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewKind(u32);

impl ViewKind {
    /// Wrap a raw view kind.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw integer passed to the host widget.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a layout resource.
///
/// Several definitions may share one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub u32);

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout#{}", self.0)
    }
}

/// A model item that can be displayed by a recyclical list.
///
/// The default [`type_key`](ListItem::type_key) is the Rust type name, which
/// suits lists holding a single model type.
pub trait ListItem: Clone + PartialEq + Send + Sync + 'static {
    /// Key used to look up the item's definition.
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }
}

impl ListItem for String {}

//! Error types for recyclical.

use crate::item::{TypeKey, ViewKind};

/// Result type alias for recyclical operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// Configuration and not-found errors are programmer errors surfaced at setup
/// time; out-of-bounds errors come from index-based list access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The setup is incomplete or contradictory.
    Configuration,
    /// A type key or view kind was queried but never registered.
    NotFound,
    /// An index was outside the bounds of the list.
    OutOfBounds,
    /// A scoped accessor was used after its callback returned.
    Released,
    /// An operation was invoked in the wrong lifecycle state.
    Lifecycle,
}

/// Errors that can occur while configuring or driving a list.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `validate` was called on a registry with no item definitions.
    #[error("no item definitions were registered")]
    NoDefinitions,

    /// Some, but not all, definitions supply a stable ID getter.
    #[error("if one item definition has stable IDs, all of them must")]
    MixedStableIds,

    /// The setup was finalized without a data source.
    #[error("no data source was set")]
    NoDataSource,

    /// The registry maps disagree in size.
    #[error(
        "item registry is inconsistent: {type_keys} type keys, {layouts} layouts, {definitions} definitions"
    )]
    InconsistentRegistry {
        type_keys: usize,
        layouts: usize,
        definitions: usize,
    },

    /// A model type was registered twice.
    #[error("type {0} is already registered")]
    DuplicateTypeKey(TypeKey),

    /// A definition was registered without `on_bind`.
    #[error("item definition for {0} has no view holder creator, call on_bind")]
    MissingViewHolderCreator(TypeKey),

    /// No view kind was registered for the type key.
    #[error("didn't find a view kind for {0}")]
    ViewKindNotFound(TypeKey),

    /// No layout was registered for the view kind.
    #[error("didn't find a layout for view kind {0}")]
    LayoutNotFound(ViewKind),

    /// No definition was registered for the view kind.
    #[error("didn't find a definition for view kind {0}")]
    DefinitionNotFound(ViewKind),

    /// No definition was registered for the type key.
    #[error("didn't find a definition for {0}")]
    TypeNotFound(TypeKey),

    /// An index was outside `[0, len)` (or `[0, len]` for inserts).
    #[error("index {index} is out of bounds for a list of {len} items")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A selection-state accessor was used after being released.
    #[error("selection state accessor was already released")]
    AlreadyReleased,

    /// The handle has no attached data source.
    #[error("data source is not attached")]
    NotAttached,

    /// A view holder was used before being bound to a position.
    #[error("view holder is not bound to a position")]
    HolderNotBound,
}

impl Error {
    /// Create an out-of-bounds error.
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoDefinitions
            | Self::MixedStableIds
            | Self::NoDataSource
            | Self::InconsistentRegistry { .. }
            | Self::DuplicateTypeKey(_)
            | Self::MissingViewHolderCreator(_) => ErrorKind::Configuration,
            Self::ViewKindNotFound(_)
            | Self::LayoutNotFound(_)
            | Self::DefinitionNotFound(_)
            | Self::TypeNotFound(_) => ErrorKind::NotFound,
            Self::IndexOutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::AlreadyReleased => ErrorKind::Released,
            Self::NotAttached | Self::HolderNotBound => ErrorKind::Lifecycle,
        }
    }
}

//! Plugins extend a handle with behavior outside the core binding.

use std::any::Any;
use std::sync::Arc;

use crate::handle::Handle;
use crate::item::ListItem;

/// An extension attached and detached together with its handle.
///
/// Plugins are registered on the setup with
/// [`Setup::with_plugin`](crate::Setup::with_plugin) and retrieved later with
/// [`Handle::plugin`].
pub trait Plugin<T: ListItem>: Send + Sync + 'static {
    /// Called when the handle attaches its data source.
    fn attach(&self, handle: &Arc<Handle<T>>);

    /// Called when the handle detaches its data source.
    fn detach(&self) {}

    /// Used by [`Handle::plugin`] to recover the concrete type.
    fn as_any(&self) -> &dyn Any;
}

//! The binding coordinator between a data source and its widget.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use recyclical_core::logging::targets;

use crate::adapter::DefinitionAdapter;
use crate::datasource::DataSource;
use crate::error::Result;
use crate::item::{ItemDefinition, ItemRegistry, ListItem, TypeKey, ViewKind};
use crate::plugin::Plugin;
use crate::surface::{AdapterSurface, EmptyView};

/// The object that ties a validated registry, a data source and a widget
/// surface together.
///
/// Every data source notification passes through
/// [`invalidate_list`](Self::invalidate_list), which replays it onto the
/// surface and then updates the empty view from the list's emptiness.
///
/// A handle is built by [`Setup`](crate::Setup) and is live between
/// [`attach_data_source`](Self::attach_data_source) and
/// [`detach_data_source`](Self::detach_data_source), which the host calls
/// when the widget enters and leaves its window.
pub struct Handle<T: ListItem> {
    registry: Arc<ItemRegistry<T>>,
    data_source: Arc<dyn DataSource<T>>,
    surface: Arc<dyn AdapterSurface>,
    adapter: DefinitionAdapter<T>,
    empty_view: Option<Arc<dyn EmptyView>>,
    empty_view_visible: AtomicBool,
    plugins: Vec<(&'static str, Box<dyn Plugin<T>>)>,
    attached: AtomicBool,
    // Whether the data source accepted this handle on the last attach.
    bound: AtomicBool,
}

pub(crate) struct HandleParts<T: ListItem> {
    pub(crate) registry: Arc<ItemRegistry<T>>,
    pub(crate) data_source: Arc<dyn DataSource<T>>,
    pub(crate) surface: Arc<dyn AdapterSurface>,
    pub(crate) adapter: DefinitionAdapter<T>,
    pub(crate) empty_view: Option<Arc<dyn EmptyView>>,
    pub(crate) plugins: Vec<(&'static str, Box<dyn Plugin<T>>)>,
}

impl<T: ListItem> Handle<T> {
    pub(crate) fn new(parts: HandleParts<T>) -> Self {
        Self {
            registry: parts.registry,
            data_source: parts.data_source,
            surface: parts.surface,
            adapter: parts.adapter,
            empty_view: parts.empty_view,
            empty_view_visible: AtomicBool::new(false),
            plugins: parts.plugins,
            attached: AtomicBool::new(false),
            bound: AtomicBool::new(false),
        }
    }

    /// Show or hide the empty view. Does nothing without an empty view.
    pub fn show_or_hide_empty_view(&self, show: bool) {
        let Some(empty_view) = &self.empty_view else {
            return;
        };
        let was_visible = self.empty_view_visible.swap(show, Ordering::SeqCst);
        if was_visible != show {
            tracing::debug!(target: targets::HANDLE, visible = show, "empty view toggled");
        }
        empty_view.set_visible(show);
    }

    /// Whether the empty view was last shown.
    pub fn is_empty_view_visible(&self) -> bool {
        self.empty_view_visible.load(Ordering::SeqCst)
    }

    /// Apply `block` to the widget surface, then refresh the empty view.
    pub fn invalidate_list(&self, block: impl FnOnce(&dyn AdapterSurface)) {
        block(self.surface.as_ref());
        self.show_or_hide_empty_view(self.data_source.is_empty());
    }

    /// The view kind registered for `key`.
    pub fn view_kind_for_type_key(&self, key: &TypeKey) -> Result<ViewKind> {
        self.registry.kind_for_type_key(key)
    }

    /// The definition registered for `key`.
    pub fn definition_for_type_key(&self, key: &TypeKey) -> Result<&ItemDefinition<T>> {
        self.registry.definition_for_type_key(key)
    }

    /// The definition registered for `kind`.
    pub fn definition_for_view_kind(&self, kind: ViewKind) -> Result<&ItemDefinition<T>> {
        self.registry.definition_for_kind(kind)
    }

    /// Start forwarding: attach the data source, the adapter and plugins.
    ///
    /// The data source immediately notifies a full reset. Calling this on a
    /// live handle does nothing. A data source already bound to another live
    /// handle stays bound to it and does not notify this one.
    pub fn attach_data_source(self: &Arc<Self>) {
        if self.attached.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!(target: targets::HANDLE, "attaching data source");
        self.adapter.attach(self.data_source.clone());
        let bound = self.data_source.attach(Arc::downgrade(self));
        self.bound.store(bound, Ordering::SeqCst);
        for (name, plugin) in &self.plugins {
            tracing::trace!(target: targets::PLUGIN, plugin = name, "attaching plugin");
            plugin.attach(self);
        }
    }

    /// Stop forwarding and drop every cross reference.
    ///
    /// The data source is only released if it was bound to this handle.
    pub fn detach_data_source(&self) {
        if !self.attached.swap(false, Ordering::SeqCst) {
            return;
        }
        tracing::debug!(target: targets::HANDLE, "detaching data source");
        for (name, plugin) in &self.plugins {
            tracing::trace!(target: targets::PLUGIN, plugin = name, "detaching plugin");
            plugin.detach();
        }
        self.adapter.detach();
        if self.bound.swap(false, Ordering::SeqCst) {
            self.data_source.detach();
        }
    }

    /// Whether the handle is between attach and detach.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// The adapter the host widget queries.
    pub fn adapter(&self) -> &DefinitionAdapter<T> {
        &self.adapter
    }

    /// The data source.
    pub fn data_source(&self) -> &Arc<dyn DataSource<T>> {
        &self.data_source
    }

    /// The validated registry.
    pub fn registry(&self) -> &ItemRegistry<T> {
        &self.registry
    }

    /// The widget surface.
    pub fn surface(&self) -> &Arc<dyn AdapterSurface> {
        &self.surface
    }

    /// The plugin registered under `name`, if it is a `P`.
    pub fn plugin<P: Plugin<T>>(&self, name: &str) -> Option<&P> {
        self.plugins
            .iter()
            .find(|(plugin_name, _)| *plugin_name == name)
            .and_then(|(_, plugin)| plugin.as_any().downcast_ref())
    }
}

impl<T: ListItem> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("registry", &self.registry)
            .field("attached", &self.is_attached())
            .field("empty_view_visible", &self.is_empty_view_visible())
            .field(
                "plugins",
                &self.plugins.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

//! The widget-facing adapter.
//!
//! The host widget asks the adapter how many rows there are, which view kind
//! each row has, and to create, bind and recycle view holders. Clicks on a
//! row are routed back through the adapter to the item definitions.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use recyclical_core::logging::targets;

use crate::datasource::DataSource;
use crate::error::{Error, Result};
use crate::item::{ItemDefinition, ItemHandler, ItemRegistry, LayoutId, ListItem, ViewKind};
use crate::selection::SelectionState;

/// A row view created by an item definition.
///
/// Wraps the definition's own holder type, which can be recovered with
/// [`downcast_ref`](Self::downcast_ref).
pub struct ViewHolder {
    view_kind: ViewKind,
    layout: LayoutId,
    position: Option<usize>,
    clickable: bool,
    long_clickable: bool,
    inner: Box<dyn Any + Send>,
}

impl ViewHolder {
    /// The view kind this holder was created for.
    pub fn view_kind(&self) -> ViewKind {
        self.view_kind
    }

    /// The layout the holder was created from.
    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    /// The position last bound, `None` before binding or after recycling.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Whether a click handler applies to this row.
    pub fn is_clickable(&self) -> bool {
        self.clickable
    }

    /// Whether a long-click handler applies to this row.
    pub fn is_long_clickable(&self) -> bool {
        self.long_clickable
    }

    /// The definition's holder, if it is an `H`.
    pub fn downcast_ref<H: 'static>(&self) -> Option<&H> {
        self.inner.downcast_ref()
    }

    /// The definition's holder, mutably, if it is an `H`.
    pub fn downcast_mut<H: 'static>(&mut self) -> Option<&mut H> {
        self.inner.downcast_mut()
    }
}

impl fmt::Debug for ViewHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHolder")
            .field("view_kind", &self.view_kind)
            .field("layout", &self.layout)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Global click handlers applied to every row after the row's own handler.
pub(crate) struct GlobalHandlers<T: ListItem> {
    pub(crate) click: Option<ItemHandler<T>>,
    pub(crate) long_click: Option<ItemHandler<T>>,
}

/// Adapter between the host widget and the item registry.
pub struct DefinitionAdapter<T: ListItem> {
    registry: Arc<ItemRegistry<T>>,
    data_source: RwLock<Option<Arc<dyn DataSource<T>>>>,
    globals: GlobalHandlers<T>,
    has_stable_ids: bool,
}

impl<T: ListItem> DefinitionAdapter<T> {
    pub(crate) fn new(
        registry: Arc<ItemRegistry<T>>,
        globals: GlobalHandlers<T>,
        has_stable_ids: bool,
    ) -> Self {
        Self {
            registry,
            data_source: RwLock::new(None),
            globals,
            has_stable_ids,
        }
    }

    pub(crate) fn attach(&self, data_source: Arc<dyn DataSource<T>>) {
        *self.data_source.write() = Some(data_source);
    }

    pub(crate) fn detach(&self) {
        self.data_source.write().take();
    }

    /// Whether a data source is attached.
    pub fn is_attached(&self) -> bool {
        self.data_source.read().is_some()
    }

    fn data_source(&self) -> Result<Arc<dyn DataSource<T>>> {
        self.data_source.read().clone().ok_or(Error::NotAttached)
    }

    /// Number of rows, zero while detached.
    pub fn item_count(&self) -> usize {
        self.data_source
            .read()
            .as_ref()
            .map_or(0, |source| source.len())
    }

    /// The view kind of the row at `position`.
    pub fn item_view_kind(&self, position: usize) -> Result<ViewKind> {
        let item = self.data_source()?.get(position)?;
        self.registry.kind_for_type_key(&item.type_key())
    }

    /// The stable ID of the row at `position`, `None` without stable IDs.
    pub fn item_id(&self, position: usize) -> Result<Option<u64>> {
        if !self.has_stable_ids {
            return Ok(None);
        }
        let item = self.data_source()?.get(position)?;
        let definition = self.registry.definition_for_type_key(&item.type_key())?;
        Ok(definition.stable_id(&item))
    }

    /// Whether rows have stable IDs.
    pub fn has_stable_ids(&self) -> bool {
        self.has_stable_ids
    }

    /// Create a view holder for `kind`.
    #[tracing::instrument(skip(self), target = "recyclical::adapter", level = "trace")]
    pub fn create_view_holder(&self, kind: ViewKind) -> Result<ViewHolder> {
        let layout = self.registry.layout_for_kind(kind)?;
        let definition = self.registry.definition_for_kind(kind)?;
        let inner = definition.create_holder(layout)?;

        Ok(ViewHolder {
            view_kind: kind,
            layout,
            position: None,
            clickable: definition.click_handler().is_some() || self.globals.click.is_some(),
            long_clickable: definition.long_click_handler().is_some()
                || self.globals.long_click.is_some(),
            inner,
        })
    }

    /// Bind the row at `position` into `holder`.
    pub fn bind_view_holder(&self, holder: &mut ViewHolder, position: usize) -> Result<()> {
        let item = self.data_source()?.get(position)?;
        let type_key = item.type_key();
        let kind = self.registry.kind_for_type_key(&type_key)?;
        if kind != holder.view_kind {
            tracing::warn!(
                target: targets::ADAPTER,
                %type_key,
                expected = %kind,
                actual = %holder.view_kind,
                position,
                "binding a holder of another view kind"
            );
        }
        let definition = self.registry.definition_for_kind(kind)?;

        holder.position = Some(position);
        definition.bind(holder.inner.as_mut(), position, &item);
        tracing::trace!(target: targets::ADAPTER, position, view_kind = %kind, "bound view holder");
        Ok(())
    }

    /// Notify the holder's definition that the holder was recycled.
    pub fn view_recycled(&self, holder: &mut ViewHolder) -> Result<()> {
        let definition = self.registry.definition_for_kind(holder.view_kind)?;
        definition.recycle(holder.inner.as_mut());
        holder.position = None;
        Ok(())
    }

    /// Dispatch a click on `holder`'s row.
    ///
    /// Returns whether any handler ran.
    pub fn item_clicked(&self, holder: &ViewHolder) -> Result<bool> {
        self.dispatch(
            holder,
            ItemDefinition::click_handler,
            self.globals.click.as_ref(),
        )
    }

    /// Dispatch a long click on `holder`'s row.
    pub fn item_long_clicked(&self, holder: &ViewHolder) -> Result<bool> {
        self.dispatch(
            holder,
            ItemDefinition::long_click_handler,
            self.globals.long_click.as_ref(),
        )
    }

    /// Dispatch a click on the child view named `child` of `holder`'s row.
    ///
    /// Only the child binding runs; global handlers do not apply.
    pub fn child_clicked(&self, holder: &ViewHolder, child: &str) -> Result<bool> {
        self.dispatch(
            holder,
            |definition| definition.child_click_handler(child),
            None,
        )
    }

    fn dispatch<'a>(
        &'a self,
        holder: &ViewHolder,
        handler_for: impl FnOnce(&'a ItemDefinition<T>) -> Option<&'a ItemHandler<T>>,
        global: Option<&'a ItemHandler<T>>,
    ) -> Result<bool> {
        let position = holder.position.ok_or(Error::HolderNotBound)?;
        let source = self.data_source()?;
        let item = source.get(position)?;
        let definition = self.registry.definition_for_type_key(&item.type_key())?;
        let handler = handler_for(definition);

        if handler.is_none() && global.is_none() {
            return Ok(false);
        }
        tracing::trace!(target: targets::ADAPTER, position, "dispatching click");

        SelectionState::scoped(source, position, |state| {
            if let Some(handler) = handler {
                handler(state, position);
            }
            if let Some(global) = global {
                global(state, position);
            }
        });
        Ok(true)
    }
}

impl<T: ListItem> fmt::Debug for DefinitionAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionAdapter")
            .field("item_count", &self.item_count())
            .field("has_stable_ids", &self.has_stable_ids)
            .finish()
    }
}

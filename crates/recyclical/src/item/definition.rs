//! Per-type item definitions.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use recyclical_core::logging::targets;

use super::{LayoutId, ListItem, TypeKey};
use crate::error::{Error, Result};
use crate::selection::SelectionState;

/// Click handler invoked with a scoped selection accessor and the row index.
pub type ItemHandler<T> = Arc<dyn Fn(&SelectionState<T>, usize) + Send + Sync>;

type ErasedHolder = Box<dyn Any + Send>;
type HolderCreator = Box<dyn Fn(LayoutId) -> ErasedHolder + Send + Sync>;
type HolderBinder<T> = Box<dyn Fn(&mut (dyn Any + Send), usize, &T) -> bool + Send + Sync>;
type HolderRecycler = Box<dyn Fn(&mut (dyn Any + Send)) -> bool + Send + Sync>;
type IdGetter<T> = Box<dyn Fn(&T) -> u64 + Send + Sync>;

/// Describes how rows of one model type are created, bound and clicked.
///
/// The holder type `H` chosen in [`on_bind`](Self::on_bind) is erased; the
/// definition downcasts it again when binding and recycling.
///
/// # Example
///
/// ```
/// use recyclical::item::{ItemDefinition, LayoutId};
///
/// struct NameHolder {
///     text: String,
/// }
///
/// let definition = ItemDefinition::<String>::for_type::<String>()
///     .on_bind(
///         |_layout: LayoutId| NameHolder { text: String::new() },
///         |holder, _index, item: &String| holder.text = item.clone(),
///     )
///     .on_click(|state, index| {
///         let _ = state.toggle_selection();
///         println!("clicked row {index}");
///     });
/// ```
pub struct ItemDefinition<T: ListItem> {
    type_key: TypeKey,
    creator: Option<HolderCreator>,
    binder: Option<HolderBinder<T>>,
    on_click: Option<ItemHandler<T>>,
    on_long_click: Option<ItemHandler<T>>,
    stable_id: Option<IdGetter<T>>,
    on_recycled: Option<HolderRecycler>,
    child_clicks: Vec<(&'static str, ItemHandler<T>)>,
}

impl<T: ListItem> ItemDefinition<T> {
    /// Create a definition for rows whose items report `type_key`.
    pub fn new(type_key: impl Into<TypeKey>) -> Self {
        Self {
            type_key: type_key.into(),
            creator: None,
            binder: None,
            on_click: None,
            on_long_click: None,
            stable_id: None,
            on_recycled: None,
            child_clicks: Vec::new(),
        }
    }

    /// Create a definition keyed by the Rust type name of `M`.
    pub fn for_type<M: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<M>())
    }

    /// Set the view holder creator and the bind function.
    pub fn on_bind<H, C, B>(mut self, creator: C, binder: B) -> Self
    where
        H: Send + 'static,
        C: Fn(LayoutId) -> H + Send + Sync + 'static,
        B: Fn(&mut H, usize, &T) + Send + Sync + 'static,
    {
        self.creator = Some(Box::new(move |layout| -> ErasedHolder {
            Box::new(creator(layout))
        }));
        self.binder = Some(Box::new(
            move |holder: &mut (dyn Any + Send), index: usize, item: &T| match holder
                .downcast_mut::<H>()
            {
                Some(holder) => {
                    binder(holder, index, item);
                    true
                }
                None => false,
            },
        ));
        self
    }

    /// Set the click handler.
    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SelectionState<T>, usize) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(handler));
        self
    }

    /// Set the long-click handler.
    pub fn on_long_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SelectionState<T>, usize) + Send + Sync + 'static,
    {
        self.on_long_click = Some(Arc::new(handler));
        self
    }

    /// Provide a stable ID for each item.
    ///
    /// Either every definition of a list supplies this, or none does.
    pub fn has_stable_ids<F>(mut self, id_getter: F) -> Self
    where
        F: Fn(&T) -> u64 + Send + Sync + 'static,
    {
        self.stable_id = Some(Box::new(id_getter));
        self
    }

    /// Called when a holder of this definition is recycled.
    ///
    /// `H` must be the holder type produced by [`on_bind`](Self::on_bind).
    pub fn on_recycled<H, F>(mut self, callback: F) -> Self
    where
        H: Send + 'static,
        F: Fn(&mut H) + Send + Sync + 'static,
    {
        self.on_recycled = Some(Box::new(move |holder: &mut (dyn Any + Send)| match holder
            .downcast_mut::<H>()
        {
            Some(holder) => {
                callback(holder);
                true
            }
            None => false,
        }));
        self
    }

    /// Bind a click handler to a named child view of the row.
    pub fn on_child_click<F>(mut self, child: &'static str, handler: F) -> Self
    where
        F: Fn(&SelectionState<T>, usize) + Send + Sync + 'static,
    {
        self.child_clicks.push((child, Arc::new(handler)));
        self
    }

    /// The key of the model type this definition handles.
    pub fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    /// Whether a stable ID getter was supplied.
    pub fn has_stable_id_getter(&self) -> bool {
        self.stable_id.is_some()
    }

    pub(crate) fn has_creator(&self) -> bool {
        self.creator.is_some()
    }

    pub(crate) fn stable_id(&self, item: &T) -> Option<u64> {
        self.stable_id.as_ref().map(|getter| getter(item))
    }

    pub(crate) fn create_holder(&self, layout: LayoutId) -> Result<ErasedHolder> {
        let creator = self
            .creator
            .as_ref()
            .ok_or_else(|| Error::MissingViewHolderCreator(self.type_key.clone()))?;
        Ok(creator(layout))
    }

    pub(crate) fn bind(&self, holder: &mut (dyn Any + Send), index: usize, item: &T) {
        if let Some(binder) = &self.binder
            && !binder(holder, index, item)
        {
            tracing::warn!(
                target: targets::ADAPTER,
                type_key = %self.type_key,
                index,
                "view holder type does not match the bind function, skipping bind"
            );
        }
    }

    pub(crate) fn recycle(&self, holder: &mut (dyn Any + Send)) {
        if let Some(recycler) = &self.on_recycled
            && !recycler(holder)
        {
            tracing::warn!(
                target: targets::ADAPTER,
                type_key = %self.type_key,
                "view holder type does not match the recycle callback, skipping"
            );
        }
    }

    pub(crate) fn click_handler(&self) -> Option<&ItemHandler<T>> {
        self.on_click.as_ref()
    }

    pub(crate) fn long_click_handler(&self) -> Option<&ItemHandler<T>> {
        self.on_long_click.as_ref()
    }

    pub(crate) fn child_click_handler(&self, child: &str) -> Option<&ItemHandler<T>> {
        self.child_clicks
            .iter()
            .find(|(name, _)| *name == child)
            .map(|(_, handler)| handler)
    }

    /// Names of the child views with click bindings, in registration order.
    pub fn child_views(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.child_clicks.iter().map(|(name, _)| *name)
    }
}

impl<T: ListItem> fmt::Debug for ItemDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemDefinition")
            .field("type_key", &self.type_key)
            .field("has_creator", &self.creator.is_some())
            .field("has_click", &self.on_click.is_some())
            .field("has_long_click", &self.on_long_click.is_some())
            .field("has_stable_ids", &self.stable_id.is_some())
            .field("child_clicks", &self.child_clicks.len())
            .finish()
    }
}

//! Builder wiring definitions, a data source and a surface into a handle.

use std::fmt;
use std::sync::Arc;

use recyclical_core::logging::targets;

use crate::adapter::{DefinitionAdapter, GlobalHandlers};
use crate::datasource::DataSource;
use crate::error::{Error, Result};
use crate::handle::{Handle, HandleParts};
use crate::item::{ItemDefinition, ItemRegistry, LayoutId, ListItem};
use crate::plugin::Plugin;
use crate::selection::SelectionState;
use crate::surface::{AdapterSurface, EmptyView};
#[cfg(feature = "swipe")]
use crate::{
    item::TypeKey,
    swipe::{SWIPE_PLUGIN, SwipeAction, SwipeLocation, SwipePlugin},
};

/// Configures a list before it is bound to a widget.
///
/// Registration errors do not interrupt the chain; the first one is
/// returned from [`build`](Self::build).
///
/// # Example
///
/// ```
/// use recyclical::datasource::{DataSource, data_source_of};
/// use recyclical::{ItemDefinition, LayoutId, ListUpdate, RecordingSurface, Setup};
/// use std::sync::Arc;
///
/// let names = data_source_of(Vec::<String>::new());
/// let surface = Arc::new(RecordingSurface::new());
///
/// let handle = Setup::<String>::new()
///     .with_data_source(names.clone())
///     .with_item(
///         LayoutId(1),
///         ItemDefinition::for_type::<String>()
///             .on_bind(|_| String::new(), |label: &mut String, _, name: &String| {
///                 *label = name.clone();
///             }),
///     )
///     .attach(surface.clone())
///     .unwrap();
///
/// names.push("Ada".to_string());
/// assert_eq!(
///     surface.take(),
///     vec![ListUpdate::Reset, ListUpdate::Inserted { position: 0, count: 1 }]
/// );
/// assert_eq!(handle.adapter().item_count(), 1);
/// ```
pub struct Setup<T: ListItem> {
    registry: ItemRegistry<T>,
    error: Option<Error>,
    data_source: Option<Arc<dyn DataSource<T>>>,
    empty_view: Option<Arc<dyn EmptyView>>,
    globals: GlobalHandlers<T>,
    plugins: Vec<(&'static str, Box<dyn Plugin<T>>)>,
    #[cfg(feature = "swipe")]
    swipe: Option<SwipePlugin<T>>,
}

impl<T: ListItem> Default for Setup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListItem> Setup<T> {
    /// Start an empty setup with no definitions and no data source.
    pub fn new() -> Self {
        Self {
            registry: ItemRegistry::new(),
            error: None,
            data_source: None,
            empty_view: None,
            globals: GlobalHandlers {
                click: None,
                long_click: None,
            },
            plugins: Vec::new(),
            #[cfg(feature = "swipe")]
            swipe: None,
        }
    }

    /// Register `definition` with the row layout `layout`.
    pub fn with_item(mut self, layout: LayoutId, definition: ItemDefinition<T>) -> Self {
        if let Err(err) = self.registry.register(layout, definition)
            && self.error.is_none()
        {
            self.error = Some(err);
        }
        self
    }

    /// Show `view` whenever the list is empty.
    pub fn with_empty_view(mut self, view: Arc<dyn EmptyView>) -> Self {
        self.empty_view = Some(view);
        self
    }

    /// Bind `source` to the list. Required.
    pub fn with_data_source<D>(mut self, source: Arc<D>) -> Self
    where
        D: DataSource<T> + 'static,
    {
        self.data_source = Some(source as Arc<dyn DataSource<T>>);
        self
    }

    /// Run `handler` after any row's own click handler.
    pub fn with_click_listener<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SelectionState<T>, usize) + Send + Sync + 'static,
    {
        self.globals.click = Some(Arc::new(handler));
        self
    }

    /// Run `handler` after any row's own long-click handler.
    pub fn with_long_click_listener<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SelectionState<T>, usize) + Send + Sync + 'static,
    {
        self.globals.long_click = Some(Arc::new(handler));
        self
    }

    /// Add `plugin` under `name`. It follows the handle's attach lifecycle.
    pub fn with_plugin(mut self, name: &'static str, plugin: impl Plugin<T>) -> Self {
        self.plugins.push((name, Box::new(plugin)));
        self
    }

    /// Reveal `action` when any row is swiped to one of `locations`.
    #[cfg(feature = "swipe")]
    pub fn with_swipe_action(self, locations: &[SwipeLocation], action: SwipeAction<T>) -> Self {
        self.add_swipe_action(locations, None, action)
    }

    /// Reveal `action` when a row of `type_key` is swiped to one of
    /// `locations`.
    #[cfg(feature = "swipe")]
    pub fn with_swipe_action_for(
        self,
        type_key: impl Into<TypeKey>,
        locations: &[SwipeLocation],
        action: SwipeAction<T>,
    ) -> Self {
        self.add_swipe_action(locations, Some(type_key.into()), action)
    }

    #[cfg(feature = "swipe")]
    fn add_swipe_action(
        mut self,
        locations: &[SwipeLocation],
        type_key: Option<TypeKey>,
        action: SwipeAction<T>,
    ) -> Self {
        let swipe = self.swipe.get_or_insert_with(SwipePlugin::new);
        for &location in locations {
            swipe.add_action(location, type_key.clone(), action.clone());
        }
        self
    }

    /// Validate the configuration and create an unattached handle.
    ///
    /// # Errors
    ///
    /// The first registration error, then [`Error::NoDefinitions`],
    /// [`Error::NoDataSource`] or [`Error::MixedStableIds`].
    pub fn build(self, surface: Arc<dyn AdapterSurface>) -> Result<Arc<Handle<T>>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.registry.validate()?;
        let data_source = self.data_source.ok_or(Error::NoDataSource)?;
        let has_stable_ids = self.registry.has_stable_ids()?;

        #[allow(unused_mut)]
        let mut plugins = self.plugins;
        #[cfg(feature = "swipe")]
        if let Some(swipe) = self.swipe {
            plugins.push((SWIPE_PLUGIN, Box::new(swipe)));
        }

        surface.set_has_stable_ids(has_stable_ids);
        let registry = Arc::new(self.registry);
        let adapter = DefinitionAdapter::new(registry.clone(), self.globals, has_stable_ids);

        tracing::debug!(
            target: targets::HANDLE,
            definitions = registry.len(),
            has_stable_ids,
            plugins = plugins.len(),
            "built handle"
        );

        Ok(Arc::new(Handle::new(HandleParts {
            registry,
            data_source,
            surface,
            adapter,
            empty_view: self.empty_view,
            plugins,
        })))
    }

    /// [`build`](Self::build) and attach the data source.
    pub fn attach(self, surface: Arc<dyn AdapterSurface>) -> Result<Arc<Handle<T>>> {
        let handle = self.build(surface)?;
        handle.attach_data_source();
        Ok(handle)
    }
}

impl<T: ListItem> fmt::Debug for Setup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setup")
            .field("registry", &self.registry)
            .field("error", &self.error)
            .field("has_data_source", &self.data_source.is_some())
            .field("plugins", &self.plugins.len())
            .finish_non_exhaustive()
    }
}

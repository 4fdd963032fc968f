//! Swipe-to-act support.
//!
//! Actions are registered per swipe location, either for every row or for
//! rows of one type key. When the host reports a completed swipe, the
//! matching action's callback decides the row's fate: returning `true`
//! removes the item, returning `false` rebinds it so the row slides back.
//!
//! Gesture tracking and the painting of the action background are left to
//! the host; [`SwipeAction`] only carries the presentation data it needs.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use recyclical_core::logging::targets;

use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::item::{ListItem, TypeKey};
use crate::plugin::Plugin;

/// The name the swipe plugin is registered under.
pub const SWIPE_PLUGIN: &str = "swipe";

/// The side a row was swiped towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeLocation {
    Left,
    Right,
}

/// The directions a row may be swiped in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwipeDirections {
    pub left: bool,
    pub right: bool,
}

impl SwipeDirections {
    /// Whether no direction is enabled.
    pub fn is_none(&self) -> bool {
        !self.left && !self.right
    }

    fn enable(&mut self, location: SwipeLocation) {
        match location {
            SwipeLocation::Left => self.left = true,
            SwipeLocation::Right => self.right = true,
        }
    }
}

/// What happened to a swiped row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// The callback accepted the swipe and the item was removed.
    Removed,
    /// The callback declined and the row was rebound in place.
    Restored,
    /// No action applies to the row at that location.
    Ignored,
}

/// Callback run when a swipe completes. Returns whether to remove the item.
pub type SwipeCallback<T> = Arc<dyn Fn(usize, &T) -> bool + Send + Sync>;

/// An action revealed behind a row while it is swiped.
#[derive(Clone)]
pub struct SwipeAction<T: ListItem> {
    text: Option<String>,
    text_color: u32,
    background_color: u32,
    icon: Option<u32>,
    haptic: bool,
    callback: Option<SwipeCallback<T>>,
}

impl<T: ListItem> Default for SwipeAction<T> {
    fn default() -> Self {
        Self {
            text: None,
            text_color: 0xFFFF_FFFF,
            background_color: 0xFF00_0000,
            icon: None,
            haptic: false,
            callback: None,
        }
    }
}

impl<T: ListItem> SwipeAction<T> {
    /// Create an action with no label and no callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Label drawn behind the row.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Label color as `0xAARRGGBB`.
    pub fn text_color(mut self, color: u32) -> Self {
        self.text_color = color;
        self
    }

    /// Background color as `0xAARRGGBB`.
    pub fn color(mut self, color: u32) -> Self {
        self.background_color = color;
        self
    }

    /// Host resource ID of an icon drawn next to the label.
    pub fn icon(mut self, icon: u32) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Whether the host should give haptic feedback when the swipe
    /// threshold is crossed.
    pub fn haptic(mut self, haptic: bool) -> Self {
        self.haptic = haptic;
        self
    }

    /// Run `callback` when a swipe completes.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, &T) -> bool + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// The label drawn over the background, if any.
    pub fn label(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Label color as ARGB.
    pub fn label_color(&self) -> u32 {
        self.text_color
    }

    /// Background color as ARGB.
    pub fn background_color(&self) -> u32 {
        self.background_color
    }

    /// Host resource ID of the icon, if any.
    pub fn icon_id(&self) -> Option<u32> {
        self.icon
    }

    /// Whether crossing the swipe threshold gives haptic feedback.
    pub fn is_haptic(&self) -> bool {
        self.haptic
    }

    fn run(&self, index: usize, item: &T) -> bool {
        self.callback
            .as_ref()
            .is_some_and(|callback| callback(index, item))
    }
}

impl<T: ListItem> fmt::Debug for SwipeAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeAction")
            .field("text", &self.text)
            .field("background_color", &format_args!("{:#010x}", self.background_color))
            .field("icon", &self.icon)
            .field("haptic", &self.haptic)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

type ActionKey = (SwipeLocation, Option<TypeKey>);

/// Plugin resolving completed swipes against the registered actions.
pub struct SwipePlugin<T: ListItem> {
    actions: HashMap<ActionKey, SwipeAction<T>>,
    handle: RwLock<Option<Weak<Handle<T>>>>,
}

impl<T: ListItem> Default for SwipePlugin<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListItem> SwipePlugin<T> {
    /// Create a plugin with no actions.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            handle: RwLock::new(None),
        }
    }

    /// Register `action` for `location`, for rows of `type_key` or, with
    /// `None`, for every row. Replaces an earlier action for the same key.
    pub fn add_action(
        &mut self,
        location: SwipeLocation,
        type_key: Option<TypeKey>,
        action: SwipeAction<T>,
    ) {
        self.actions.insert((location, type_key), action);
    }

    /// Number of registered actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// The action that applies to rows of `type_key` swiped to `location`.
    ///
    /// An action registered for the type wins over a global one.
    pub fn action_for(&self, location: SwipeLocation, type_key: &TypeKey) -> Option<&SwipeAction<T>> {
        self.actions
            .get(&(location, Some(type_key.clone())))
            .or_else(|| self.actions.get(&(location, None)))
    }

    /// Every direction some action is registered for.
    pub fn swipe_directions(&self) -> SwipeDirections {
        let mut directions = SwipeDirections::default();
        for (location, _) in self.actions.keys() {
            directions.enable(*location);
        }
        directions
    }

    /// The directions the row at `index` may be swiped in.
    pub fn swipe_directions_at(&self, index: usize) -> Result<SwipeDirections> {
        let type_key = self.handle()?.data_source().get(index)?.type_key();
        let mut directions = SwipeDirections::default();
        for location in [SwipeLocation::Left, SwipeLocation::Right] {
            if self.action_for(location, &type_key).is_some() {
                directions.enable(location);
            }
        }
        Ok(directions)
    }

    /// Resolve a completed swipe of the row at `index`.
    pub fn swiped(&self, index: usize, location: SwipeLocation) -> Result<SwipeOutcome> {
        let handle = self.handle()?;
        let data_source = handle.data_source();
        let item = data_source.get(index)?;
        let type_key = item.type_key();

        let Some(action) = self.action_for(location, &type_key) else {
            tracing::debug!(
                target: targets::PLUGIN,
                index,
                ?location,
                %type_key,
                "no swipe action for row"
            );
            return Ok(SwipeOutcome::Ignored);
        };

        if action.run(index, &item) {
            data_source.remove_at(index)?;
            tracing::debug!(target: targets::PLUGIN, index, ?location, "swipe removed item");
            Ok(SwipeOutcome::Removed)
        } else {
            data_source.invalidate_at(index)?;
            tracing::debug!(target: targets::PLUGIN, index, ?location, "swipe restored item");
            Ok(SwipeOutcome::Restored)
        }
    }

    fn handle(&self) -> Result<Arc<Handle<T>>> {
        self.handle
            .read()
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(Error::NotAttached)
    }
}

impl<T: ListItem> Plugin<T> for SwipePlugin<T> {
    fn attach(&self, handle: &Arc<Handle<T>>) {
        *self.handle.write() = Some(Arc::downgrade(handle));
    }

    fn detach(&self) {
        self.handle.write().take();
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl<T: ListItem> fmt::Debug for SwipePlugin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipePlugin")
            .field("actions", &self.actions.len())
            .field("directions", &self.swipe_directions())
            .finish()
    }
}

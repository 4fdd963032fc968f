//! The registry mapping model types to view kinds, layouts and definitions.

use std::collections::{BTreeMap, HashMap};

use recyclical_core::logging::targets;

use super::{ItemDefinition, LayoutId, ListItem, TypeKey, ViewKind};
use crate::error::{Error, Result};

/// Bidirectional mapping between type keys and view kinds.
///
/// Each registration gets a fresh view kind, so two definitions may share one
/// layout but never one view kind. The registry is frozen once a
/// [`Handle`](crate::Handle) is built from it.
pub struct ItemRegistry<T: ListItem> {
    kinds_by_type: HashMap<TypeKey, ViewKind>,
    layouts: BTreeMap<ViewKind, LayoutId>,
    definitions: BTreeMap<ViewKind, ItemDefinition<T>>,
}

impl<T: ListItem> Default for ItemRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListItem> ItemRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            kinds_by_type: HashMap::new(),
            layouts: BTreeMap::new(),
            definitions: BTreeMap::new(),
        }
    }

    /// Register a definition displayed with `layout`.
    ///
    /// Returns the view kind assigned to it, one more than the highest kind
    /// assigned so far.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateTypeKey`] if the definition's type key is already
    /// registered, [`Error::MissingViewHolderCreator`] if the definition has
    /// no `on_bind`.
    pub fn register(&mut self, layout: LayoutId, definition: ItemDefinition<T>) -> Result<ViewKind> {
        let type_key = definition.type_key().clone();
        if self.kinds_by_type.contains_key(&type_key) {
            return Err(Error::DuplicateTypeKey(type_key));
        }
        if !definition.has_creator() {
            return Err(Error::MissingViewHolderCreator(type_key));
        }

        let next = self
            .definitions
            .keys()
            .next_back()
            .map_or(1, |kind| kind.get() + 1);
        let kind = ViewKind::new(next);

        tracing::debug!(
            target: targets::REGISTRY,
            %type_key,
            %layout,
            view_kind = next,
            "registered item definition"
        );

        self.kinds_by_type.insert(type_key, kind);
        self.layouts.insert(kind, layout);
        self.definitions.insert(kind, definition);
        Ok(kind)
    }

    /// The layout registered for `kind`.
    pub fn layout_for_kind(&self, kind: ViewKind) -> Result<LayoutId> {
        self.layouts
            .get(&kind)
            .copied()
            .ok_or(Error::LayoutNotFound(kind))
    }

    /// The definition registered for `kind`.
    pub fn definition_for_kind(&self, kind: ViewKind) -> Result<&ItemDefinition<T>> {
        self.definitions
            .get(&kind)
            .ok_or(Error::DefinitionNotFound(kind))
    }

    /// The view kind registered for `key`.
    pub fn kind_for_type_key(&self, key: &TypeKey) -> Result<ViewKind> {
        self.kinds_by_type
            .get(key)
            .copied()
            .ok_or_else(|| Error::ViewKindNotFound(key.clone()))
    }

    /// The definition registered for `key`.
    pub fn definition_for_type_key(&self, key: &TypeKey) -> Result<&ItemDefinition<T>> {
        let kind = self
            .kinds_by_type
            .get(key)
            .ok_or_else(|| Error::TypeNotFound(key.clone()))?;
        self.definition_for_kind(*kind)
    }

    /// Whether every definition supplies a stable ID getter.
    ///
    /// # Errors
    ///
    /// [`Error::MixedStableIds`] if some definitions do and others don't.
    pub fn has_stable_ids(&self) -> Result<bool> {
        let with_ids = self
            .definitions
            .values()
            .filter(|definition| definition.has_stable_id_getter())
            .count();
        match with_ids {
            0 => Ok(false),
            n if n == self.definitions.len() => Ok(true),
            _ => Err(Error::MixedStableIds),
        }
    }

    /// Check that the registry is usable.
    ///
    /// # Errors
    ///
    /// [`Error::NoDefinitions`] if nothing was registered,
    /// [`Error::InconsistentRegistry`] if the internal maps disagree.
    pub fn validate(&self) -> Result<()> {
        if self.definitions.is_empty() {
            return Err(Error::NoDefinitions);
        }
        let (type_keys, layouts, definitions) = (
            self.kinds_by_type.len(),
            self.layouts.len(),
            self.definitions.len(),
        );
        if type_keys != definitions || layouts != definitions {
            return Err(Error::InconsistentRegistry {
                type_keys,
                layouts,
                definitions,
            });
        }
        tracing::trace!(target: targets::REGISTRY, definitions, "registry validated");
        Ok(())
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The registered view kinds in ascending order.
    pub fn view_kinds(&self) -> impl Iterator<Item = ViewKind> + '_ {
        self.definitions.keys().copied()
    }
}

impl<T: ListItem> std::fmt::Debug for ItemRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemRegistry")
            .field("kinds_by_type", &self.kinds_by_type)
            .field("layouts", &self.layouts)
            .finish()
    }
}

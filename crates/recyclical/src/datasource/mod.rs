//! Data sources: mutable lists that notify their handle of every change.
//!
//! A data source owns the ordered items shown by the list. Every mutation
//! computes the granular [`ListUpdate`]s it implies, replays them onto the
//! attached [`Handle`] (if any) and then emits them on
//! [`DataSource::changed`].
//!
//! # Example
//!
//! ```
//! use recyclical::datasource::{DataSource, ListDataSource, ListUpdate};
//! use std::sync::{Arc, Mutex};
//!
//! let list = ListDataSource::from_items(vec!["a".to_string(), "b".to_string()]);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let seen_clone = seen.clone();
//! list.changed().connect(move |update| seen_clone.lock().unwrap().push(*update));
//!
//! list.push("c".to_string());
//! list.move_item(2, 0).unwrap();
//!
//! assert_eq!(list.to_vec(), vec!["c", "a", "b"]);
//! assert_eq!(
//!     *seen.lock().unwrap(),
//!     vec![
//!         ListUpdate::Inserted { position: 2, count: 1 },
//!         ListUpdate::Moved { from: 2, to: 0 },
//!     ]
//! );
//! ```

pub mod diff;
mod list;
mod selectable;
mod update;

use std::sync::{Arc, Weak};

use recyclical_core::Signal;

pub use diff::{DiffResult, calculate_diff};
pub use list::ListDataSource;
pub use selectable::SelectableDataSource;
pub use update::ListUpdate;

use crate::error::Result;
use crate::handle::Handle;
use crate::item::{ListItem, TypeKey};

/// Predicate comparing an old item with a new one during a diff.
pub type ItemComparer<'a, T> = &'a dyn Fn(&T, &T) -> bool;

/// An ordered, observable list of items.
///
/// Mutators take `&self`; implementations use interior locking and release
/// it before notifying, so listeners may read the list re-entrantly.
pub trait DataSource<T: ListItem>: Send + Sync {
    /// The item at `index`.
    fn get(&self, index: usize) -> Result<T>;

    /// Number of items.
    fn len(&self) -> usize;

    /// Whether the list has no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `f` for every item, in order.
    fn for_each(&self, f: &mut dyn FnMut(&T));

    /// Call `f` for every item whose type key is `key`.
    fn for_each_of(&self, key: &TypeKey, f: &mut dyn FnMut(&T)) {
        self.for_each(&mut |item| {
            if item.type_key() == *key {
                f(item)
            }
        });
    }

    /// Index of the first item matching `predicate`.
    fn index_of_first(&self, predicate: &dyn Fn(&T) -> bool) -> Option<usize>;

    /// Index of the last item matching `predicate`.
    fn index_of_last(&self, predicate: &dyn Fn(&T) -> bool) -> Option<usize>;

    /// Index of the first item equal to `item`.
    fn index_of(&self, item: &T) -> Option<usize> {
        self.index_of_first(&|other| other == item)
    }

    /// Whether an item equal to `item` is in the list.
    fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// A copy of the items.
    fn to_vec(&self) -> Vec<T>;

    /// Iterate over a snapshot of the items.
    fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    /// Append `items`. Appending nothing does nothing.
    fn add(&self, items: Vec<T>);

    /// Append one item.
    fn push(&self, item: T) {
        self.add(vec![item]);
    }

    /// Insert `item` at `index`, shifting later items up.
    fn insert(&self, index: usize, item: T) -> Result<()>;

    /// Remove and return the item at `index`.
    fn remove_at(&self, index: usize) -> Result<T>;

    /// Remove the first item equal to `item`.
    ///
    /// Returns `false` without notifying if no such item exists.
    fn remove(&self, item: &T) -> bool {
        match self.index_of(item) {
            Some(index) => self.remove_at(index).is_ok(),
            None => false,
        }
    }

    /// Exchange two items. Notifies two discrete changes, not a move.
    fn swap(&self, left: usize, right: usize) -> Result<()>;

    /// Move the item at `from` so it ends up at `to`.
    fn move_item(&self, from: usize, to: usize) -> Result<()>;

    /// Replace every item.
    ///
    /// When the list is non-empty and both predicates are given, the minimal
    /// insert/remove/move/change script is computed and notified. Otherwise
    /// a single [`ListUpdate::Reset`] is notified.
    fn set(
        &self,
        items: Vec<T>,
        same_identity: Option<ItemComparer<'_, T>>,
        same_content: Option<ItemComparer<'_, T>>,
    );

    /// Replace every item and reset the list.
    fn set_items(&self, items: Vec<T>) {
        self.set(items, None, None);
    }

    /// Replace every item, notifying the computed diff.
    fn set_with_diff(
        &self,
        items: Vec<T>,
        same_identity: ItemComparer<'_, T>,
        same_content: ItemComparer<'_, T>,
    ) {
        self.set(items, Some(same_identity), Some(same_content));
    }

    /// Remove every item.
    fn clear(&self);

    /// Ask the widget to rebind the item at `index`.
    fn invalidate_at(&self, index: usize) -> Result<()>;

    /// Ask the widget to rebind everything.
    fn invalidate_all(&self);

    /// Bind to a handle. The first attach wins; later calls are ignored.
    ///
    /// Returns `true` if `handle` is now the bound handle.
    fn attach(&self, handle: Weak<Handle<T>>) -> bool;

    /// Drop the handle reference and every change listener.
    fn detach(&self);

    /// Whether a live handle is attached.
    fn is_attached(&self) -> bool;

    /// Emitted with every update, after the handle was notified.
    fn changed(&self) -> &Signal<ListUpdate>;

    /// This source as a selectable one, if it tracks selection.
    fn as_selectable(&self) -> Option<&dyn SelectableSource<T>> {
        None
    }
}

/// A data source that also tracks a set of selected positions.
///
/// Selection follows items across structural mutations: inserting, removing,
/// swapping and moving items rewrite the selected positions so the same
/// items stay selected.
pub trait SelectableSource<T: ListItem>: DataSource<T> {
    /// Select the item at `index`.
    ///
    /// Returns `true` if the selection changed. Out-of-range indices return
    /// `false`.
    fn select_at(&self, index: usize) -> bool;

    /// Deselect the item at `index`.
    fn deselect_at(&self, index: usize) -> bool;

    /// Flip the selection of the item at `index`.
    fn toggle_selection_at(&self, index: usize) -> bool {
        if self.is_selected_at(index) {
            self.deselect_at(index)
        } else {
            self.select_at(index)
        }
    }

    /// Whether the item at `index` is selected.
    fn is_selected_at(&self, index: usize) -> bool;

    /// Select every item. Returns `true` if the selection changed.
    fn select_all(&self) -> bool;

    /// Deselect every item. Returns `true` if the selection changed.
    fn deselect_all(&self) -> bool;

    /// Number of selected items.
    fn selection_count(&self) -> usize;

    /// Whether any item is selected.
    fn has_selection(&self) -> bool {
        self.selection_count() > 0
    }

    /// Selected positions in ascending order.
    fn selected_indices(&self) -> Vec<usize>;

    /// Select the first item equal to `item`.
    fn select(&self, item: &T) -> bool {
        self.index_of(item).is_some_and(|index| self.select_at(index))
    }

    /// Deselect the first item equal to `item`.
    fn deselect(&self, item: &T) -> bool {
        self.index_of(item).is_some_and(|index| self.deselect_at(index))
    }

    /// Flip the selection of the first item equal to `item`.
    fn toggle_selection(&self, item: &T) -> bool {
        self.index_of(item)
            .is_some_and(|index| self.toggle_selection_at(index))
    }

    /// Whether the first item equal to `item` is selected.
    fn is_selected(&self, item: &T) -> bool {
        self.index_of(item)
            .is_some_and(|index| self.is_selected_at(index))
    }

    /// Emitted with the selected positions whenever the selection changes.
    fn selection_changed(&self) -> &Signal<Vec<usize>>;
}

/// Create a data source holding `items`.
pub fn data_source_of<T: ListItem>(items: Vec<T>) -> Arc<ListDataSource<T>> {
    Arc::new(ListDataSource::from_items(items))
}

/// Create an empty data source.
pub fn empty_data_source<T: ListItem>() -> Arc<ListDataSource<T>> {
    Arc::new(ListDataSource::new())
}

/// Create a selectable data source holding `items`.
pub fn selectable_data_source_of<T: ListItem>(items: Vec<T>) -> Arc<SelectableDataSource<T>> {
    Arc::new(SelectableDataSource::from_items(items))
}

/// Create an empty selectable data source.
pub fn empty_selectable_data_source<T: ListItem>() -> Arc<SelectableDataSource<T>> {
    Arc::new(SelectableDataSource::new())
}

//! The plain list data source.

use std::fmt;
use std::sync::Weak;

use parking_lot::RwLock;
use recyclical_core::logging::targets;
use recyclical_core::{Signal, ThreadAffinity};

use super::diff::calculate_diff;
use super::{DataSource, ItemComparer, ListUpdate};
use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::item::ListItem;

/// A mutable list of items backed by a `Vec`.
///
/// Created standalone, with or without initial items, and later attached to
/// exactly one [`Handle`]. Until then mutations still apply and still reach
/// the [`changed`](DataSource::changed) listeners.
///
/// Mutations are expected on the thread that created the list; debug builds
/// assert this.
pub struct ListDataSource<T: ListItem> {
    items: RwLock<Vec<T>>,
    handle: RwLock<Option<Weak<Handle<T>>>>,
    changed: Signal<ListUpdate>,
    affinity: ThreadAffinity,
}

impl<T: ListItem> Default for ListDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListItem> ListDataSource<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    /// Creates a list holding `items`.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            handle: RwLock::new(None),
            changed: Signal::new(),
            affinity: ThreadAffinity::current(),
        }
    }

    /// Read access to the items for the duration of `f`.
    ///
    /// `f` must not mutate this list.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.read())
    }

    fn attached_handle(&self) -> Option<std::sync::Arc<Handle<T>>> {
        self.handle.read().as_ref().and_then(Weak::upgrade)
    }

    /// Forward `updates` to the handle, then to the change listeners.
    ///
    /// Must be called with no lock held.
    fn notify(&self, updates: &[ListUpdate]) {
        if updates.is_empty() {
            return;
        }
        for update in updates {
            tracing::trace!(target: targets::DATA_SOURCE, ?update, "list changed");
        }

        if let Some(handle) = self.attached_handle() {
            handle.invalidate_list(|surface| {
                for update in updates {
                    update.apply_to(surface);
                }
            });
        }
        for update in updates {
            self.changed.emit(*update);
        }
    }
}

impl<T: ListItem> DataSource<T> for ListDataSource<T> {
    fn get(&self, index: usize) -> Result<T> {
        let items = self.items.read();
        items
            .get(index)
            .cloned()
            .ok_or_else(|| Error::out_of_bounds(index, items.len()))
    }

    fn len(&self) -> usize {
        self.items.read().len()
    }

    fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn for_each(&self, f: &mut dyn FnMut(&T)) {
        // Iterate a snapshot so `f` may mutate the list.
        for item in self.to_vec().iter() {
            f(item);
        }
    }

    fn index_of_first(&self, predicate: &dyn Fn(&T) -> bool) -> Option<usize> {
        self.items.read().iter().position(predicate)
    }

    fn index_of_last(&self, predicate: &dyn Fn(&T) -> bool) -> Option<usize> {
        self.items.read().iter().rposition(predicate)
    }

    fn to_vec(&self) -> Vec<T> {
        self.items.read().clone()
    }

    fn add(&self, new_items: Vec<T>) {
        self.affinity.debug_assert_same_thread();
        if new_items.is_empty() {
            return;
        }
        let count = new_items.len();
        let position = {
            let mut items = self.items.write();
            let position = items.len();
            items.extend(new_items);
            position
        };
        self.notify(&[ListUpdate::Inserted { position, count }]);
    }

    fn insert(&self, index: usize, item: T) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        {
            let mut items = self.items.write();
            if index > items.len() {
                return Err(Error::out_of_bounds(index, items.len()));
            }
            items.insert(index, item);
        }
        self.notify(&[ListUpdate::Inserted {
            position: index,
            count: 1,
        }]);
        Ok(())
    }

    fn remove_at(&self, index: usize) -> Result<T> {
        self.affinity.debug_assert_same_thread();
        let removed = {
            let mut items = self.items.write();
            if index >= items.len() {
                return Err(Error::out_of_bounds(index, items.len()));
            }
            items.remove(index)
        };
        self.notify(&[ListUpdate::Removed {
            position: index,
            count: 1,
        }]);
        Ok(removed)
    }

    fn swap(&self, left: usize, right: usize) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        {
            let mut items = self.items.write();
            let len = items.len();
            if let Some(&index) = [left, right].iter().find(|&&index| index >= len) {
                return Err(Error::out_of_bounds(index, len));
            }
            items.swap(left, right);
        }
        self.notify(&[
            ListUpdate::Changed {
                position: left,
                count: 1,
            },
            ListUpdate::Changed {
                position: right,
                count: 1,
            },
        ]);
        Ok(())
    }

    fn move_item(&self, from: usize, to: usize) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        {
            let mut items = self.items.write();
            let len = items.len();
            if let Some(&index) = [from, to].iter().find(|&&index| index >= len) {
                return Err(Error::out_of_bounds(index, len));
            }
            let item = items.remove(from);
            items.insert(to, item);
        }
        self.notify(&[ListUpdate::Moved { from, to }]);
        Ok(())
    }

    fn set(
        &self,
        new_items: Vec<T>,
        same_identity: Option<ItemComparer<'_, T>>,
        same_content: Option<ItemComparer<'_, T>>,
    ) {
        self.affinity.debug_assert_same_thread();
        let old_items = std::mem::replace(&mut *self.items.write(), new_items);

        match (same_identity, same_content) {
            (Some(same_identity), Some(same_content)) if !old_items.is_empty() => {
                let diff = {
                    let items = self.items.read();
                    calculate_diff(&old_items, &items[..], same_identity, same_content)
                };
                tracing::debug!(
                    target: targets::DATA_SOURCE,
                    old_len = old_items.len(),
                    updates = diff.updates().len(),
                    "replaced items using diff"
                );
                self.notify(diff.updates());
            }
            _ => {
                tracing::debug!(
                    target: targets::DATA_SOURCE,
                    old_len = old_items.len(),
                    "replaced items"
                );
                self.notify(&[ListUpdate::Reset]);
            }
        }
    }

    fn clear(&self) {
        self.affinity.debug_assert_same_thread();
        self.items.write().clear();
        self.notify(&[ListUpdate::Reset]);
    }

    fn invalidate_at(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(Error::out_of_bounds(index, len));
        }
        self.notify(&[ListUpdate::Changed {
            position: index,
            count: 1,
        }]);
        Ok(())
    }

    fn invalidate_all(&self) {
        self.notify(&[ListUpdate::Reset]);
    }

    fn attach(&self, handle: Weak<Handle<T>>) -> bool {
        {
            let mut slot = self.handle.write();
            if slot.as_ref().is_some_and(|existing| existing.strong_count() > 0) {
                tracing::debug!(
                    target: targets::DATA_SOURCE,
                    "already attached, ignoring attach"
                );
                return false;
            }
            *slot = Some(handle);
        }
        tracing::debug!(target: targets::DATA_SOURCE, "attached to handle");
        self.invalidate_all();
        true
    }

    fn detach(&self) {
        self.handle.write().take();
        self.changed.disconnect_all();
        tracing::debug!(target: targets::DATA_SOURCE, "detached from handle");
    }

    fn is_attached(&self) -> bool {
        self.attached_handle().is_some()
    }

    fn changed(&self) -> &Signal<ListUpdate> {
        &self.changed
    }
}

impl<T: ListItem + fmt::Debug> fmt::Debug for ListDataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDataSource")
            .field("items", &*self.items.read())
            .field("listeners", &self.changed.connection_count())
            .finish()
    }
}

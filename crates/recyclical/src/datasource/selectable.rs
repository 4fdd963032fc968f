//! A data source that tracks selected positions.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Weak;

use parking_lot::Mutex;
use recyclical_core::Signal;
use recyclical_core::logging::targets;

use super::{DataSource, ItemComparer, ListDataSource, ListUpdate, SelectableSource};
use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::item::ListItem;

/// A [`ListDataSource`] with a set of selected positions.
///
/// Every selected position stays within `[0, len)`. Structural mutations
/// rewrite the set before touching the items so the same items stay
/// selected:
///
/// - `insert` shifts selected positions at or after the insertion point up.
/// - `remove_at` drops the removed position and shifts later ones down.
/// - `swap` and `move_item` carry selection along with the items.
/// - `clear` and `set` drop positions that no longer exist.
///
/// ```
/// use recyclical::datasource::{DataSource, SelectableDataSource, SelectableSource};
///
/// let list = SelectableDataSource::from_items(vec![
///     "a".to_string(),
///     "b".to_string(),
///     "c".to_string(),
/// ]);
/// list.select_at(2);
/// list.move_item(2, 0).unwrap();
/// assert_eq!(list.selected_indices(), vec![0]);
/// ```
pub struct SelectableDataSource<T: ListItem> {
    inner: ListDataSource<T>,
    selected: Mutex<BTreeSet<usize>>,
    selection_changed: Signal<Vec<usize>>,
}

impl<T: ListItem> Default for SelectableDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListItem> SelectableDataSource<T> {
    /// Creates an empty list with nothing selected.
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    /// Creates a list holding `items` with nothing selected.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            inner: ListDataSource::from_items(items),
            selected: Mutex::new(BTreeSet::new()),
            selection_changed: Signal::new(),
        }
    }

    /// Rewrite the selected set, returning whether its contents changed.
    fn rewrite_selection(&self, rewrite: impl FnOnce(&mut BTreeSet<usize>)) -> bool {
        let mut selected = self.selected.lock();
        let before = selected.clone();
        rewrite(&mut *selected);
        let changed = *selected != before;
        if changed {
            tracing::trace!(
                target: targets::SELECTION,
                before = ?before,
                after = ?*selected,
                "selection rewritten"
            );
        }
        changed
    }

    fn emit_selection_changed(&self) {
        let selected = self.selected_indices();
        self.selection_changed.emit(selected);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.inner.len();
        if index >= len {
            return Err(Error::out_of_bounds(index, len));
        }
        Ok(())
    }
}

impl<T: ListItem> DataSource<T> for SelectableDataSource<T> {
    fn get(&self, index: usize) -> Result<T> {
        self.inner.get(index)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn for_each(&self, f: &mut dyn FnMut(&T)) {
        self.inner.for_each(f)
    }

    fn index_of_first(&self, predicate: &dyn Fn(&T) -> bool) -> Option<usize> {
        self.inner.index_of_first(predicate)
    }

    fn index_of_last(&self, predicate: &dyn Fn(&T) -> bool) -> Option<usize> {
        self.inner.index_of_last(predicate)
    }

    fn to_vec(&self) -> Vec<T> {
        self.inner.to_vec()
    }

    fn add(&self, items: Vec<T>) {
        self.inner.add(items)
    }

    fn insert(&self, index: usize, item: T) -> Result<()> {
        let len = self.inner.len();
        if index > len {
            return Err(Error::out_of_bounds(index, len));
        }
        let new_len = len + 1;
        let changed = self.rewrite_selection(|selected| {
            let shifted: Vec<usize> = selected.range(index..).rev().copied().collect();
            for old in shifted {
                selected.remove(&old);
                if old + 1 < new_len {
                    selected.insert(old + 1);
                }
            }
        });
        self.inner.insert(index, item)?;
        if changed {
            self.emit_selection_changed();
        }
        Ok(())
    }

    fn remove_at(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        let changed = self.rewrite_selection(|selected| {
            selected.remove(&index);
            let shifted: Vec<usize> = selected.range(index + 1..).copied().collect();
            for old in shifted {
                selected.remove(&old);
                selected.insert(old - 1);
            }
        });
        let removed = self.inner.remove_at(index)?;
        if changed {
            self.emit_selection_changed();
        }
        Ok(removed)
    }

    fn swap(&self, left: usize, right: usize) -> Result<()> {
        self.check_index(left)?;
        self.check_index(right)?;
        let changed = self.rewrite_selection(|selected| {
            let left_selected = selected.contains(&left);
            let right_selected = selected.contains(&right);
            for (position, select) in [(right, left_selected), (left, right_selected)] {
                if select {
                    selected.insert(position);
                } else {
                    selected.remove(&position);
                }
            }
        });
        self.inner.swap(left, right)?;
        if changed {
            self.emit_selection_changed();
        }
        Ok(())
    }

    fn move_item(&self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let changed = self.rewrite_selection(|selected| {
            *selected = selected
                .iter()
                .map(|&position| moved_position(position, from, to))
                .collect();
        });
        self.inner.move_item(from, to)?;
        if changed {
            self.emit_selection_changed();
        }
        Ok(())
    }

    fn set(
        &self,
        items: Vec<T>,
        same_identity: Option<ItemComparer<'_, T>>,
        same_content: Option<ItemComparer<'_, T>>,
    ) {
        let new_len = items.len();
        let changed = self.rewrite_selection(|selected| {
            selected.retain(|&position| position < new_len);
        });
        self.inner.set(items, same_identity, same_content);
        if changed {
            self.emit_selection_changed();
        }
    }

    fn clear(&self) {
        let changed = self.rewrite_selection(BTreeSet::clear);
        self.inner.clear();
        if changed {
            self.emit_selection_changed();
        }
    }

    fn invalidate_at(&self, index: usize) -> Result<()> {
        self.inner.invalidate_at(index)
    }

    fn invalidate_all(&self) {
        self.inner.invalidate_all()
    }

    fn attach(&self, handle: Weak<Handle<T>>) -> bool {
        self.inner.attach(handle)
    }

    fn detach(&self) {
        self.inner.detach()
    }

    fn is_attached(&self) -> bool {
        self.inner.is_attached()
    }

    fn changed(&self) -> &Signal<ListUpdate> {
        self.inner.changed()
    }

    fn as_selectable(&self) -> Option<&dyn SelectableSource<T>> {
        Some(self)
    }
}

impl<T: ListItem> SelectableSource<T> for SelectableDataSource<T> {
    fn select_at(&self, index: usize) -> bool {
        if index >= self.inner.len() {
            return false;
        }
        if !self.selected.lock().insert(index) {
            return false;
        }
        tracing::trace!(target: targets::SELECTION, index, "selected");
        // Cannot fail, the index was checked above.
        let _ = self.inner.invalidate_at(index);
        self.emit_selection_changed();
        true
    }

    fn deselect_at(&self, index: usize) -> bool {
        if index >= self.inner.len() {
            return false;
        }
        if !self.selected.lock().remove(&index) {
            return false;
        }
        tracing::trace!(target: targets::SELECTION, index, "deselected");
        let _ = self.inner.invalidate_at(index);
        self.emit_selection_changed();
        true
    }

    fn is_selected_at(&self, index: usize) -> bool {
        self.selected.lock().contains(&index)
    }

    fn select_all(&self) -> bool {
        let len = self.inner.len();
        let newly_selected: Vec<usize> = {
            let mut selected = self.selected.lock();
            (0..len).filter(|&index| selected.insert(index)).collect()
        };
        if newly_selected.is_empty() {
            return false;
        }
        for index in &newly_selected {
            let _ = self.inner.invalidate_at(*index);
        }
        self.emit_selection_changed();
        true
    }

    fn deselect_all(&self) -> bool {
        let deselected: Vec<usize> = std::mem::take(&mut *self.selected.lock())
            .into_iter()
            .collect();
        if deselected.is_empty() {
            return false;
        }
        for index in &deselected {
            let _ = self.inner.invalidate_at(*index);
        }
        self.emit_selection_changed();
        true
    }

    fn selection_count(&self) -> usize {
        self.selected.lock().len()
    }

    fn selected_indices(&self) -> Vec<usize> {
        self.selected.lock().iter().copied().collect()
    }

    fn selection_changed(&self) -> &Signal<Vec<usize>> {
        &self.selection_changed
    }
}

/// Where an item at `position` ends up after moving `from` to `to`.
fn moved_position(position: usize, from: usize, to: usize) -> usize {
    if position == from {
        to
    } else if from < to && position > from && position <= to {
        position - 1
    } else if to < from && position >= to && position < from {
        position + 1
    } else {
        position
    }
}

impl<T: ListItem + fmt::Debug> fmt::Debug for SelectableDataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectableDataSource")
            .field("inner", &self.inner)
            .field("selected", &*self.selected.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn numbered(len: usize) -> SelectableDataSource<String> {
        SelectableDataSource::from_items((0..len).map(|i| format!("item{i}")).collect())
    }

    fn selection_events(list: &SelectableDataSource<String>) -> Arc<Mutex<Vec<Vec<usize>>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        list.selection_changed()
            .connect(move |selected| events_clone.lock().push(selected.clone()));
        events
    }

    fn changes(list: &SelectableDataSource<String>) -> Arc<Mutex<Vec<ListUpdate>>> {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let updates_clone = updates.clone();
        list.changed()
            .connect(move |update| updates_clone.lock().push(*update));
        updates
    }

    #[test]
    fn test_select_and_deselect_at() {
        let list = numbered(3);
        let events = selection_events(&list);
        let updates = changes(&list);

        assert!(list.select_at(1));
        assert!(!list.select_at(1));
        assert!(!list.select_at(3));
        assert!(list.is_selected_at(1));
        assert!(list.has_selection());

        assert!(list.deselect_at(1));
        assert!(!list.deselect_at(1));
        assert!(!list.deselect_at(7));
        assert!(!list.has_selection());

        assert_eq!(*events.lock(), vec![vec![1], vec![]]);
        assert_eq!(
            *updates.lock(),
            vec![
                ListUpdate::Changed {
                    position: 1,
                    count: 1
                };
                2
            ]
        );
    }

    #[test]
    fn test_toggle() {
        let list = numbered(2);
        assert!(list.toggle_selection_at(0));
        assert!(list.is_selected_at(0));
        assert!(list.toggle_selection_at(0));
        assert!(!list.is_selected_at(0));
        assert!(!list.toggle_selection_at(5));
    }

    #[test]
    fn test_item_based_selection() {
        let list = numbered(3);
        let item = "item2".to_string();
        let absent = "nope".to_string();

        assert!(list.select(&item));
        assert!(list.is_selected(&item));
        assert!(!list.select(&absent));
        assert!(!list.is_selected(&absent));
        assert!(list.toggle_selection(&item));
        assert!(!list.is_selected(&item));
        assert!(!list.deselect(&item));
        assert!(!list.toggle_selection(&absent));
    }

    #[test]
    fn test_select_all_invalidates_each_changed_position() {
        let list = numbered(3);
        list.select_at(1);
        let events = selection_events(&list);
        let updates = changes(&list);

        assert!(list.select_all());
        assert!(!list.select_all());
        assert_eq!(list.selection_count(), 3);
        assert_eq!(
            *updates.lock(),
            vec![
                ListUpdate::Changed {
                    position: 0,
                    count: 1
                },
                ListUpdate::Changed {
                    position: 2,
                    count: 1
                },
            ]
        );

        updates.lock().clear();
        assert!(list.deselect_all());
        assert!(!list.deselect_all());
        assert_eq!(updates.lock().len(), 3);
        assert_eq!(*events.lock(), vec![vec![0, 1, 2], vec![]]);
    }

    #[test]
    fn test_insert_shifts_selection() {
        let list = numbered(4);
        list.select_at(0);
        list.select_at(2);

        list.insert(0, "x".into()).unwrap();
        assert_eq!(list.selected_indices(), vec![1, 3]);

        list.insert(5, "y".into()).unwrap();
        assert_eq!(list.selected_indices(), vec![1, 3]);

        list.insert(3, "z".into()).unwrap();
        assert_eq!(list.selected_indices(), vec![1, 4]);
        assert!(list.insert(99, "w".into()).is_err());
        assert_eq!(list.selected_indices(), vec![1, 4]);
    }

    #[test]
    fn test_insert_keeps_last_item_selected() {
        let list = numbered(2);
        list.select_at(1);
        list.insert(0, "x".into()).unwrap();
        assert_eq!(list.selected_indices(), vec![2]);
        assert_eq!(list.get(2).unwrap(), "item1");
    }

    #[test]
    fn test_swap_follows_items() {
        let list = numbered(4);
        list.select_at(2);
        list.swap(0, 2).unwrap();
        assert!(list.is_selected_at(0));
        assert!(!list.is_selected_at(2));

        list.select_at(2);
        list.swap(0, 2).unwrap();
        assert_eq!(list.selected_indices(), vec![0, 2]);
    }

    #[test]
    fn test_move_follows_items() {
        let list = numbered(4);
        list.select_at(2);
        list.move_item(2, 0).unwrap();
        assert!(list.is_selected_at(0));
        assert!(!list.is_selected_at(2));

        // Items shifted by a move keep their selection.
        let list = numbered(4);
        list.select_at(1);
        list.move_item(0, 3).unwrap();
        assert_eq!(list.selected_indices(), vec![0]);
        assert_eq!(list.get(0).unwrap(), "item1");
    }

    #[test]
    fn test_remove_at_renumbers() {
        let list = numbered(4);
        list.select_at(1);
        list.select_at(3);
        let events = selection_events(&list);

        list.remove_at(1).unwrap();
        assert_eq!(list.selection_count(), 1);
        assert_eq!(list.selected_indices(), vec![2]);
        assert_eq!(list.get(2).unwrap(), "item3");
        assert!(!list.is_selected(&"item1".to_string()));
        assert_eq!(*events.lock(), vec![vec![2]]);

        list.remove_at(0).unwrap();
        assert_eq!(list.selected_indices(), vec![1]);
        assert!(list.remove_at(3).is_err());
    }

    #[test]
    fn test_remove_item() {
        let list = numbered(3);
        list.select_at(2);
        assert!(list.remove(&"item0".to_string()));
        assert!(list.is_selected(&"item2".to_string()));
        assert_eq!(list.selected_indices(), vec![1]);
    }

    #[test]
    fn test_clear_and_set_drop_selection() {
        let list = numbered(4);
        list.select_at(0);
        list.select_at(3);
        let events = selection_events(&list);

        list.set_items(vec!["a".into(), "b".into()]);
        assert_eq!(list.selected_indices(), vec![0]);

        list.clear();
        assert!(!list.has_selection());
        assert_eq!(*events.lock(), vec![vec![0], vec![]]);
    }

    #[test]
    fn test_moved_position() {
        assert_eq!(moved_position(2, 2, 0), 0);
        assert_eq!(moved_position(0, 2, 0), 1);
        assert_eq!(moved_position(1, 2, 0), 2);
        assert_eq!(moved_position(3, 2, 0), 3);
        assert_eq!(moved_position(0, 0, 3), 3);
        assert_eq!(moved_position(3, 0, 3), 2);
    }

    #[test]
    fn test_as_selectable() {
        let list = numbered(1);
        let source: &dyn DataSource<String> = &list;
        assert!(source.as_selectable().is_some());
        assert!(ListDataSource::<String>::new().as_selectable().is_none());
    }
}

//! Scoped selection access for click callbacks.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use recyclical_core::logging::targets;

use crate::datasource::{DataSource, SelectableSource};
use crate::error::{Error, Result};
use crate::item::ListItem;

/// Selection access for the row a callback is handling.
///
/// A `SelectionState` is created for a single callback invocation and
/// released before the dispatcher returns. After release every accessor
/// fails with [`Error::AlreadyReleased`], so a callback that smuggles the
/// state out cannot reach the list later.
///
/// When the list is not selectable the selection methods return `Ok(false)`.
pub struct SelectionState<T: ListItem> {
    source: Mutex<Option<Arc<dyn DataSource<T>>>>,
    index: usize,
}

impl<T: ListItem> SelectionState<T> {
    /// Create an accessor for the item at `index` of `source`.
    pub fn new(source: Arc<dyn DataSource<T>>, index: usize) -> Self {
        Self {
            source: Mutex::new(Some(source)),
            index,
        }
    }

    /// Run `f` with an accessor that is released when `f` returns or unwinds.
    pub fn scoped<R>(
        source: Arc<dyn DataSource<T>>,
        index: usize,
        f: impl FnOnce(&SelectionState<T>) -> R,
    ) -> R {
        let state = Self::new(source, index);
        let result = f(&state);
        state.close();
        result
    }

    /// The position of the handled item.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The handled item.
    pub fn item(&self) -> Result<T> {
        self.source()?.get(self.index)
    }

    /// Whether the handled item is selected.
    pub fn is_selected(&self) -> Result<bool> {
        let index = self.index;
        self.with_selectable(|source| source.is_selected_at(index))
    }

    /// Select the handled item.
    pub fn select(&self) -> Result<bool> {
        let index = self.index;
        self.with_selectable(|source| source.select_at(index))
    }

    /// Deselect the handled item.
    pub fn deselect(&self) -> Result<bool> {
        let index = self.index;
        self.with_selectable(|source| source.deselect_at(index))
    }

    /// Flip the selection of the handled item.
    pub fn toggle_selection(&self) -> Result<bool> {
        let index = self.index;
        self.with_selectable(|source| source.toggle_selection_at(index))
    }

    /// Whether any item of the list is selected.
    pub fn has_selection(&self) -> Result<bool> {
        self.with_selectable(|source| source.has_selection())
    }

    /// Whether the list tracks selection at all.
    pub fn is_selectable(&self) -> Result<bool> {
        self.with_selectable(|_| true)
    }

    /// Whether [`close`](Self::close) was called.
    pub fn is_released(&self) -> bool {
        self.source.lock().is_none()
    }

    /// Drop the reference to the list. Calling this twice is harmless.
    pub fn close(&self) {
        if self.source.lock().take().is_some() {
            tracing::trace!(target: targets::SELECTION, index = self.index, "selection state released");
        }
    }

    fn source(&self) -> Result<Arc<dyn DataSource<T>>> {
        self.source.lock().clone().ok_or(Error::AlreadyReleased)
    }

    fn with_selectable(&self, f: impl FnOnce(&dyn SelectableSource<T>) -> bool) -> Result<bool> {
        let source = self.source()?;
        Ok(source.as_selectable().is_some_and(f))
    }
}

impl<T: ListItem> Drop for SelectionState<T> {
    fn drop(&mut self) {
        self.source.get_mut().take();
    }
}

impl<T: ListItem> fmt::Debug for SelectionState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("index", &self.index)
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{ListDataSource, SelectableDataSource};
    use crate::error::ErrorKind;

    fn selectable() -> Arc<SelectableDataSource<String>> {
        Arc::new(SelectableDataSource::from_items(vec![
            "a".to_string(),
            "b".to_string(),
        ]))
    }

    #[test]
    fn test_selectable_operations() {
        let list = selectable();
        let state = SelectionState::new(list.clone() as Arc<dyn DataSource<String>>, 1);

        assert_eq!(state.index(), 1);
        assert_eq!(state.item().unwrap(), "b");
        assert!(state.is_selectable().unwrap());
        assert!(!state.is_selected().unwrap());
        assert!(state.select().unwrap());
        assert!(state.is_selected().unwrap());
        assert!(state.has_selection().unwrap());
        assert!(list.is_selected_at(1));
        assert!(state.toggle_selection().unwrap());
        assert!(!state.deselect().unwrap());
        assert!(!list.has_selection());
    }

    #[test]
    fn test_non_selectable_is_noop() {
        let list: Arc<dyn DataSource<String>> =
            Arc::new(ListDataSource::from_items(vec!["a".to_string()]));
        let state = SelectionState::new(list, 0);

        assert!(!state.is_selectable().unwrap());
        assert!(!state.select().unwrap());
        assert!(!state.is_selected().unwrap());
        assert!(!state.toggle_selection().unwrap());
        assert!(!state.has_selection().unwrap());
        assert_eq!(state.item().unwrap(), "a");
    }

    #[test]
    fn test_released_fails() {
        let state = SelectionState::new(selectable() as Arc<dyn DataSource<String>>, 0);
        state.close();
        state.close();

        assert!(state.is_released());
        let err = state.item().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Released);
        assert!(matches!(state.select(), Err(Error::AlreadyReleased)));
        assert!(matches!(state.has_selection(), Err(Error::AlreadyReleased)));
    }

    #[test]
    fn test_scoped_releases_reference() {
        let list = selectable();
        let source = list.clone() as Arc<dyn DataSource<String>>;
        let strong_before = Arc::strong_count(&list);

        let item = SelectionState::scoped(source, 0, |state| state.item().unwrap());
        assert_eq!(item, "a");
        assert_eq!(Arc::strong_count(&list), strong_before - 1);
    }

    #[test]
    fn test_scoped_releases_on_panic() {
        let list = selectable();
        let strong_before = Arc::strong_count(&list);

        let source = list.clone() as Arc<dyn DataSource<String>>;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            SelectionState::scoped(source, 0, |_| {
                panic!("callback failed");
            })
        }));

        assert!(result.is_err());
        assert_eq!(Arc::strong_count(&list), strong_before);
    }
}

//! Interfaces to the host list widget.
//!
//! The host widget owns rendering and its own lifecycle. recyclical only calls
//! the notification primitives of [`AdapterSurface`] and toggles an optional
//! [`EmptyView`]; it never draws.

use parking_lot::Mutex;

use crate::datasource::ListUpdate;

/// The "notify by range" protocol of the host list widget.
///
/// Positions are 0-based and counts are non-negative; rejecting bounds that
/// do not match the widget's state is the widget's responsibility.
pub trait AdapterSurface: Send + Sync {
    /// `count` rows were inserted starting at `position`.
    fn notify_item_range_inserted(&self, position: usize, count: usize);

    /// `count` rows were removed starting at `position`.
    fn notify_item_range_removed(&self, position: usize, count: usize);

    /// `count` rows starting at `position` changed content.
    fn notify_item_range_changed(&self, position: usize, count: usize);

    /// The row at `from` moved to `to`.
    fn notify_item_moved(&self, from: usize, to: usize);

    /// Everything may have changed.
    fn notify_data_set_changed(&self);

    /// Told once at setup whether rows have stable IDs.
    fn set_has_stable_ids(&self, _has_stable_ids: bool) {}
}

/// A view shown in place of the list while it is empty.
pub trait EmptyView: Send + Sync {
    /// Show or hide the view.
    fn set_visible(&self, visible: bool);
}

/// A headless [`AdapterSurface`] that records every notification.
///
/// Useful for tests and for driving a widget from a queue of updates.
///
/// ```
/// use recyclical::{AdapterSurface, ListUpdate, RecordingSurface};
///
/// let surface = RecordingSurface::new();
/// surface.notify_item_range_inserted(0, 2);
/// assert_eq!(surface.take(), vec![ListUpdate::Inserted { position: 0, count: 2 }]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSurface {
    updates: Mutex<Vec<ListUpdate>>,
    has_stable_ids: Mutex<Option<bool>>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every update recorded so far.
    pub fn updates(&self) -> Vec<ListUpdate> {
        self.updates.lock().clone()
    }

    /// Drain the recorded updates.
    pub fn take(&self) -> Vec<ListUpdate> {
        std::mem::take(&mut *self.updates.lock())
    }

    /// The last value passed to `set_has_stable_ids`, if any.
    pub fn has_stable_ids(&self) -> Option<bool> {
        *self.has_stable_ids.lock()
    }

    fn record(&self, update: ListUpdate) {
        self.updates.lock().push(update);
    }
}

impl AdapterSurface for RecordingSurface {
    fn notify_item_range_inserted(&self, position: usize, count: usize) {
        self.record(ListUpdate::Inserted { position, count });
    }

    fn notify_item_range_removed(&self, position: usize, count: usize) {
        self.record(ListUpdate::Removed { position, count });
    }

    fn notify_item_range_changed(&self, position: usize, count: usize) {
        self.record(ListUpdate::Changed { position, count });
    }

    fn notify_item_moved(&self, from: usize, to: usize) {
        self.record(ListUpdate::Moved { from, to });
    }

    fn notify_data_set_changed(&self) {
        self.record(ListUpdate::Reset);
    }

    fn set_has_stable_ids(&self, has_stable_ids: bool) {
        *self.has_stable_ids.lock() = Some(has_stable_ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface() {
        let surface = RecordingSurface::new();
        surface.notify_item_range_inserted(0, 3);
        surface.notify_item_moved(2, 0);
        surface.notify_item_range_changed(1, 1);
        surface.notify_item_range_removed(0, 1);
        surface.notify_data_set_changed();

        assert_eq!(
            surface.updates(),
            vec![
                ListUpdate::Inserted { position: 0, count: 3 },
                ListUpdate::Moved { from: 2, to: 0 },
                ListUpdate::Changed { position: 1, count: 1 },
                ListUpdate::Removed { position: 0, count: 1 },
                ListUpdate::Reset,
            ]
        );
        assert_eq!(surface.take().len(), 5);
        assert!(surface.updates().is_empty());
    }

    #[test]
    fn test_stable_ids_flag() {
        let surface = RecordingSurface::new();
        assert_eq!(surface.has_stable_ids(), None);
        surface.set_has_stable_ids(true);
        assert_eq!(surface.has_stable_ids(), Some(true));
    }
}

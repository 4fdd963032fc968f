//! Granular list change notifications.

use crate::surface::AdapterSurface;

/// A single change to a list, expressed in positions of the list at the time
/// the update is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListUpdate {
    /// `count` items were inserted at `position`.
    Inserted { position: usize, count: usize },
    /// `count` items were removed from `position`.
    Removed { position: usize, count: usize },
    /// The item at `from` moved to `to`.
    Moved { from: usize, to: usize },
    /// `count` items starting at `position` changed content.
    Changed { position: usize, count: usize },
    /// The whole list must be re-read.
    Reset,
}

impl ListUpdate {
    /// Replay this update onto a widget surface.
    pub fn apply_to(&self, surface: &dyn AdapterSurface) {
        match *self {
            Self::Inserted { position, count } => {
                surface.notify_item_range_inserted(position, count)
            }
            Self::Removed { position, count } => surface.notify_item_range_removed(position, count),
            Self::Moved { from, to } => surface.notify_item_moved(from, to),
            Self::Changed { position, count } => surface.notify_item_range_changed(position, count),
            Self::Reset => surface.notify_data_set_changed(),
        }
    }

    /// Whether this is a full reset.
    pub fn is_reset(&self) -> bool {
        matches!(self, Self::Reset)
    }

    /// Apply this update to a plain vector of row keys.
    ///
    /// Mirrors what a widget does with the notification: inserted rows are
    /// filled from `fill`, changed rows are left in place.
    pub fn replay<K>(&self, rows: &mut Vec<K>, mut fill: impl FnMut(usize) -> K) {
        match *self {
            Self::Inserted { position, count } => {
                for offset in 0..count {
                    rows.insert(position + offset, fill(position + offset));
                }
            }
            Self::Removed { position, count } => {
                rows.drain(position..position + count);
            }
            Self::Moved { from, to } => {
                let row = rows.remove(from);
                rows.insert(to, row);
            }
            Self::Changed { .. } | Self::Reset => {}
        }
    }
}

//! Tests for diffed replacement as seen by a widget mirroring the list.

mod common;

use std::sync::Arc;

use common::{Row, init_logging, row_setup};
use parking_lot::Mutex;
use recyclical::datasource::{ListDataSource, calculate_diff};
use recyclical::{AdapterSurface, DataSource, Handle, ListUpdate, RecordingSurface};

/// A surface that keeps a copy of the rows the way a widget would: rows
/// are fetched from the list only when inserted, changed or reset.
struct MirrorSurface {
    source: Arc<ListDataSource<Row>>,
    rows: Mutex<Vec<Row>>,
    updates: Mutex<Vec<ListUpdate>>,
}

impl MirrorSurface {
    fn new(source: Arc<ListDataSource<Row>>) -> Arc<Self> {
        Arc::new(Self {
            source,
            rows: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        })
    }

    fn fetch(&self, position: usize) -> Row {
        self.source.get(position).unwrap()
    }
}

impl AdapterSurface for MirrorSurface {
    fn notify_item_range_inserted(&self, position: usize, count: usize) {
        self.updates
            .lock()
            .push(ListUpdate::Inserted { position, count });
        let mut rows = self.rows.lock();
        for index in position..position + count {
            rows.insert(index, self.fetch(index));
        }
    }

    fn notify_item_range_removed(&self, position: usize, count: usize) {
        self.updates
            .lock()
            .push(ListUpdate::Removed { position, count });
        self.rows.lock().drain(position..position + count);
    }

    fn notify_item_range_changed(&self, position: usize, count: usize) {
        self.updates
            .lock()
            .push(ListUpdate::Changed { position, count });
        let mut rows = self.rows.lock();
        for index in position..position + count {
            rows[index] = self.fetch(index);
        }
    }

    fn notify_item_moved(&self, from: usize, to: usize) {
        self.updates.lock().push(ListUpdate::Moved { from, to });
        let mut rows = self.rows.lock();
        let row = rows.remove(from);
        rows.insert(to, row);
    }

    fn notify_data_set_changed(&self) {
        self.updates.lock().push(ListUpdate::Reset);
        *self.rows.lock() = self.source.to_vec();
    }
}

fn same_identity(old: &Row, new: &Row) -> bool {
    match (old, new) {
        (Row::Header(a), Row::Header(b)) => a == b,
        (Row::Person { id: a, .. }, Row::Person { id: b, .. }) => a == b,
        _ => false,
    }
}

fn same_content(old: &Row, new: &Row) -> bool {
    old == new
}

fn mirrored(
    items: Vec<Row>,
) -> (
    Arc<ListDataSource<Row>>,
    Arc<MirrorSurface>,
    Arc<Handle<Row>>,
) {
    let source = Arc::new(ListDataSource::from_items(items));
    let surface = MirrorSurface::new(source.clone());
    let handle = row_setup()
        .with_data_source(source.clone())
        .attach(surface.clone())
        .unwrap();
    surface.updates.lock().clear();
    (source, surface, handle)
}

#[test]
fn test_rename_and_reorder_rebinds_rows() {
    init_logging();
    let (source, surface, _handle) = mirrored(vec![
        Row::header("Team"),
        Row::person(1, "Ada"),
        Row::person(2, "Grace"),
        Row::person(3, "Linus"),
    ]);

    let next = vec![
        Row::header("Team"),
        Row::person(3, "Linus"),
        Row::person(1, "Ada Lovelace"),
        Row::person(4, "Barbara"),
    ];
    source.set_with_diff(next.clone(), &same_identity, &same_content);

    let updates = surface.updates.lock().clone();
    assert!(!updates.iter().any(ListUpdate::is_reset));
    assert!(updates.contains(&ListUpdate::Removed {
        position: 2,
        count: 1
    }));
    assert_eq!(*surface.rows.lock(), next);
}

#[test]
fn test_identical_replacement_is_silent() {
    let items = vec![Row::header("Team"), Row::person(1, "Ada")];
    let (source, surface, _handle) = mirrored(items.clone());

    source.set_with_diff(items, &same_identity, &same_content);
    assert!(surface.updates.lock().is_empty());
}

#[test]
fn test_replacement_without_predicates_resets() {
    let (source, surface, _handle) = mirrored(vec![Row::header("Team")]);

    source.set_items(vec![Row::person(1, "Ada")]);
    assert_eq!(*surface.updates.lock(), vec![ListUpdate::Reset]);
    assert_eq!(*surface.rows.lock(), vec![Row::person(1, "Ada")]);
}

#[test]
fn test_diff_to_empty_and_back() {
    let (source, surface, _handle) = mirrored(vec![Row::person(1, "Ada"), Row::person(2, "Grace")]);

    source.set_with_diff(Vec::new(), &same_identity, &same_content);
    assert_eq!(
        *surface.updates.lock(),
        vec![ListUpdate::Removed {
            position: 0,
            count: 2
        }]
    );
    assert!(surface.rows.lock().is_empty());

    // An empty list resets instead of diffing.
    source.set_with_diff(vec![Row::person(3, "Linus")], &same_identity, &same_content);
    assert_eq!(surface.updates.lock().last(), Some(&ListUpdate::Reset));
    assert_eq!(*surface.rows.lock(), vec![Row::person(3, "Linus")]);
}

#[test]
fn test_dispatch_updates_to_surface() {
    let old = vec![Row::person(1, "Ada"), Row::person(2, "Grace")];
    let new = vec![Row::person(2, "Grace"), Row::person(1, "Ada")];

    let diff = calculate_diff(&old, &new, &same_identity, &same_content);
    let surface = RecordingSurface::new();
    diff.dispatch_updates_to(&surface);

    assert_eq!(surface.updates(), diff.updates().to_vec());
    assert_eq!(diff.updates().len(), 1);
}

struct Rng(u64);

impl Rng {
    fn next(&mut self, bound: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % bound as u64) as usize
    }
}

#[test]
fn test_random_replacements_converge() {
    let mut rng = Rng(0xDEAD_BEEF_CAFE_F00D);
    let initial: Vec<Row> = (0..8).map(|id| Row::person(id, "v0")).collect();
    let (source, surface, _handle) = mirrored(initial);

    for round in 1..=200u64 {
        let mut next = Vec::new();
        for row in source.to_vec() {
            if rng.next(5) == 0 {
                continue;
            }
            next.push(match row {
                Row::Person { id, name } if rng.next(4) == 0 => Row::Person {
                    id,
                    name: format!("{name}+"),
                },
                row => row,
            });
        }
        for _ in 0..rng.next(4) {
            let index = rng.next(next.len() + 1);
            next.insert(index, Row::person(100 + round * 10 + rng.next(10) as u64, "new"));
        }
        if next.len() > 1 {
            let from = rng.next(next.len());
            let row = next.remove(from);
            let to = rng.next(next.len() + 1);
            next.insert(to, row);
        }
        // Identities must be unique within a list.
        let mut seen = std::collections::HashSet::new();
        next.retain(|row| match row {
            Row::Person { id, .. } => seen.insert(*id),
            Row::Header(_) => true,
        });
        if next.is_empty() {
            next.push(Row::person(round, "refill"));
        }

        surface.updates.lock().clear();
        let was_empty = source.is_empty();
        source.set_with_diff(next.clone(), &same_identity, &same_content);

        if !was_empty {
            assert!(!surface.updates.lock().iter().any(ListUpdate::is_reset));
        }
        assert_eq!(*surface.rows.lock(), next, "round {round}");
    }
}

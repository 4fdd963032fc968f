//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use recyclical::{EmptyView, ItemDefinition, LayoutId, ListItem, Setup, TypeKey};

/// Install a test-writer subscriber honoring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, PartialEq, Debug)]
pub enum Row {
    Header(String),
    Person { id: u64, name: String },
}

impl Row {
    pub fn header(title: &str) -> Self {
        Row::Header(title.to_string())
    }

    pub fn person(id: u64, name: &str) -> Self {
        Row::Person {
            id,
            name: name.to_string(),
        }
    }
}

impl ListItem for Row {
    fn type_key(&self) -> TypeKey {
        match self {
            Row::Header(_) => TypeKey::new("Header"),
            Row::Person { .. } => TypeKey::new("Person"),
        }
    }
}

/// Holder used by every fixture definition.
#[derive(Default, Debug)]
pub struct LabelHolder {
    pub text: String,
}

pub fn header_definition() -> ItemDefinition<Row> {
    ItemDefinition::new("Header").on_bind(
        |_| LabelHolder::default(),
        |holder: &mut LabelHolder, _, row: &Row| {
            if let Row::Header(title) = row {
                holder.text = title.clone();
            }
        },
    )
}

pub fn person_definition() -> ItemDefinition<Row> {
    ItemDefinition::new("Person").on_bind(
        |_| LabelHolder::default(),
        |holder: &mut LabelHolder, _, row: &Row| {
            if let Row::Person { name, .. } = row {
                holder.text = name.clone();
            }
        },
    )
}

/// A setup with both fixture definitions registered.
pub fn row_setup() -> Setup<Row> {
    Setup::new()
        .with_item(LayoutId(10), header_definition())
        .with_item(LayoutId(20), person_definition())
}

/// Empty view recording every visibility change.
#[derive(Default)]
pub struct RecordingEmptyView {
    pub visibility: Mutex<Vec<bool>>,
}

impl RecordingEmptyView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last(&self) -> Option<bool> {
        self.visibility.lock().last().copied()
    }
}

impl EmptyView for RecordingEmptyView {
    fn set_visible(&self, visible: bool) {
        self.visibility.lock().push(visible);
    }
}

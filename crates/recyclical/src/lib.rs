//! recyclical - declarative binding of observable lists to recycling list widgets.
//!
//! A list is described by one [`ItemDefinition`] per item type, a
//! [`DataSource`](datasource::DataSource) holding the items, and an
//! [`AdapterSurface`] implemented by the host widget. [`Setup`] validates the
//! description and produces a [`Handle`], which forwards every list mutation
//! to the widget as granular range notifications and keeps an optional empty
//! view in sync.
//!
//! # Example
//!
//! ```
//! use recyclical::datasource::{SelectableSource, selectable_data_source_of};
//! use recyclical::{ItemDefinition, LayoutId, ListItem, RecordingSurface, Setup, TypeKey, ViewKind};
//! use std::sync::Arc;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Row {
//!     Header(&'static str),
//!     Person(&'static str),
//! }
//!
//! impl ListItem for Row {
//!     fn type_key(&self) -> TypeKey {
//!         match self {
//!             Row::Header(_) => TypeKey::new("Header"),
//!             Row::Person(_) => TypeKey::new("Person"),
//!         }
//!     }
//! }
//!
//! let rows = selectable_data_source_of(vec![Row::Header("Team"), Row::Person("Ada")]);
//!
//! let handle = Setup::<Row>::new()
//!     .with_data_source(rows.clone())
//!     .with_item(
//!         LayoutId(1),
//!         ItemDefinition::new("Header").on_bind(|_| String::new(), |_: &mut String, _, _: &Row| {}),
//!     )
//!     .with_item(
//!         LayoutId(2),
//!         ItemDefinition::new("Person")
//!             .on_bind(|_| String::new(), |text: &mut String, _, row: &Row| {
//!                 if let Row::Person(name) = row {
//!                     *text = name.to_string();
//!                 }
//!             })
//!             .on_click(|state, _| {
//!                 state.toggle_selection().unwrap();
//!             }),
//!     )
//!     .attach(Arc::new(RecordingSurface::new()))
//!     .unwrap();
//!
//! let adapter = handle.adapter();
//! assert_eq!(adapter.item_view_kind(1).unwrap(), ViewKind::new(2));
//!
//! let mut holder = adapter.create_view_holder(ViewKind::new(2)).unwrap();
//! adapter.bind_view_holder(&mut holder, 1).unwrap();
//! adapter.item_clicked(&holder).unwrap();
//! assert_eq!(rows.selected_indices(), vec![1]);
//! ```
//!
//! # Logging
//!
//! Every subsystem logs through `tracing` under the targets listed in
//! [`recyclical_core::logging::targets`].

pub mod adapter;
pub mod datasource;
pub mod error;
pub mod handle;
pub mod item;
pub mod plugin;
pub mod selection;
pub mod setup;
pub mod surface;
#[cfg(feature = "swipe")]
pub mod swipe;

pub use adapter::{DefinitionAdapter, ViewHolder};
pub use datasource::{
    DataSource, ListDataSource, ListUpdate, SelectableDataSource, SelectableSource,
};
pub use error::{Error, ErrorKind, Result};
pub use handle::Handle;
pub use item::{ItemDefinition, ItemHandler, ItemRegistry, LayoutId, ListItem, TypeKey, ViewKind};
pub use plugin::Plugin;
pub use selection::SelectionState;
pub use setup::Setup;
pub use surface::{AdapterSurface, EmptyView, RecordingSurface};
#[cfg(feature = "swipe")]
pub use swipe::{SwipeAction, SwipeDirections, SwipeLocation, SwipeOutcome, SwipePlugin};

pub use recyclical_core::Signal;
pub use recyclical_core::thread_check::set_thread_checks_enabled;

static_assertions::assert_impl_all!(ListDataSource<String>: Send, Sync);
static_assertions::assert_impl_all!(SelectableDataSource<String>: Send, Sync);
static_assertions::assert_impl_all!(Handle<String>: Send, Sync);
static_assertions::assert_impl_all!(Error: Send, Sync);

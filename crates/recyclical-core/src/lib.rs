//! Core systems for recyclical.
//!
//! This crate provides the small runtime layer the `recyclical` list binding
//! library is built on:
//!
//! - **Signal/Slot System**: synchronous, ordered change notification
//! - **Logging**: `tracing` targets per subsystem and performance spans
//! - **Thread Checks**: owner-thread verification for single-writer data
//!
//! # Signal/Slot Example
//!
//! ```
//! use recyclical_core::Signal;
//!
//! let selection_changed = Signal::<Vec<usize>>::new();
//!
//! let conn_id = selection_changed.connect(|selected| {
//!     println!("selected: {selected:?}");
//! });
//!
//! selection_changed.emit(vec![0, 2]);
//! selection_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;
pub mod thread_check;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(ThreadAffinity: Send, Sync, Copy);

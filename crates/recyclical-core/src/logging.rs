//! Logging facilities for recyclical.
//!
//! recyclical uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("recyclical=trace")
//!     .init();
//! ```
//!
//! Every event is emitted under one of the [`targets`], so a single subsystem
//! can be enabled on its own, e.g. `RUST_LOG=recyclical::diff=debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Data source mutations and lifecycle.
    pub const DATA_SOURCE: &str = "recyclical::data_source";
    /// Selection bookkeeping of selectable data sources.
    pub const SELECTION: &str = "recyclical::selection";
    /// Handle lifecycle and empty view toggling.
    pub const HANDLE: &str = "recyclical::handle";
    /// Item registry registration and validation.
    pub const REGISTRY: &str = "recyclical::registry";
    /// View holder creation, binding and click dispatch.
    pub const ADAPTER: &str = "recyclical::adapter";
    /// Diff computation.
    pub const DIFF: &str = "recyclical::diff";
    /// Plugins, including swipe dispatch.
    pub const PLUGIN: &str = "recyclical::plugin";
    /// Signal/slot system.
    pub const SIGNAL: &str = "recyclical_core::signal";
    /// Performance spans.
    pub const PERF: &str = "recyclical::perf";
}

/// A span guard for timing an operation.
///
/// The span is entered on creation and exited when the guard is dropped.
/// Subscribers that record span timings (e.g. `tracing-subscriber` with
/// `FmtSpan::CLOSE`) report how long the operation took.
///
/// ```
/// use recyclical_core::logging::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("calculate_diff");
///     // ... work ...
/// }
/// ```
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_prefix() {
        for target in [
            targets::DATA_SOURCE,
            targets::SELECTION,
            targets::HANDLE,
            targets::REGISTRY,
            targets::ADAPTER,
            targets::DIFF,
            targets::PLUGIN,
            targets::PERF,
        ] {
            assert!(target.starts_with("recyclical::"), "{target}");
        }
    }

    #[test]
    fn test_perf_span_without_subscriber() {
        let _span = PerfSpan::new("test_operation");
    }
}

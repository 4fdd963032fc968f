//! Thread affinity checks.
//!
//! Data sources and handles are `Send + Sync`, but their notification protocol
//! assumes a single writer: mutations and the widget notifications they
//! trigger must happen on the thread that owns the list (normally the UI
//! thread). [`ThreadAffinity`] records that thread and lets the owner verify
//! it on every mutation.
//!
//! ```
//! use recyclical_core::thread_check::ThreadAffinity;
//!
//! struct Counter {
//!     affinity: ThreadAffinity,
//!     value: std::sync::atomic::AtomicUsize,
//! }
//!
//! impl Counter {
//!     fn bump(&self) {
//!         self.affinity.debug_assert_same_thread();
//!         self.value.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!     }
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

/// Flag to enable/disable runtime thread checks globally.
static THREAD_CHECKS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Enable or disable runtime thread checks.
///
/// Checks are enabled in debug builds and disabled in release builds by
/// default.
pub fn set_thread_checks_enabled(enabled: bool) {
    THREAD_CHECKS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Check if runtime thread checks are currently enabled.
#[inline]
pub fn are_thread_checks_enabled() -> bool {
    THREAD_CHECKS_ENABLED.load(Ordering::Relaxed)
}

/// Thread affinity tracker.
///
/// Records the thread on which an object was created and verifies that
/// later operations happen on the same thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that we are on the same thread as the affinity.
    ///
    /// Runs in every build profile unless checks were disabled with
    /// [`set_thread_checks_enabled`].
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message if called from a different thread.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.assert_same_thread_with_msg("list mutated from the wrong thread")
    }

    /// Assert that we are on the same thread, with a custom message.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread while checks are enabled.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if are_thread_checks_enabled() && !self.is_same_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only assertion that we are on the same thread.
    ///
    /// This is a no-op in release builds.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "{msg}\n\
            Owner thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            Data sources and handles must be mutated on the thread that created them.",
            self.thread_id
        )
    }
}

//! # Fallback Notice
//!
//! What happens when no trusted image is loaded.
//!
//! Without an image handle the debugger would not highlight anything, so the
//! issue is dropped. To avoid failing completely silently, the first such drop
//! in the process writes a single notice and calls
//! [`runtime_issues_unavailable`], which exists only so that a symbolic
//! breakpoint can be set on it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::channel::LogChannel;

/// Text of the one-time notice.
pub const UNAVAILABLE_NOTICE: &str = "Warn only once: a runtime issue logging expectation was violated. Runtime issues will \
                                      not be logged. Set a symbolic breakpoint on 'runtime_issues_unavailable' to trace.";

static PROCESS_NOTICE: Lazy<Arc<FallbackNotice>> = Lazy::new(|| Arc::new(FallbackNotice::new()));

/// Breakpoint hook for the fallback path
///
/// Called exactly once, right before the fallback notice is written. Set a
/// symbolic breakpoint on `runtime_issues_unavailable` to see which raise
/// first hit a process without a trusted image.
#[no_mangle]
#[inline(never)]
pub extern "C" fn runtime_issues_unavailable()
{
    std::hint::black_box(());
}

/// Once-only gate for the fallback notice
///
/// Every logger shares [`FallbackNotice::process`] unless built with its own
/// gate, so the notice appears at most once per process no matter how many
/// loggers or call sites fail.
#[derive(Debug, Default)]
pub struct FallbackNotice
{
    fired: AtomicBool,
}

impl FallbackNotice
{
    #[must_use]
    pub const fn new() -> Self
    {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// The gate shared by every logger in this process.
    pub fn process() -> Arc<FallbackNotice>
    {
        Arc::clone(&PROCESS_NOTICE)
    }

    /// Write the notice through `channel` unless it was already written.
    ///
    /// Returns `true` only for the call that wrote it.
    pub fn notify(&self, channel: &dyn LogChannel) -> bool
    {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }

        runtime_issues_unavailable();
        debug!("No trusted image loaded; runtime issues are disabled for this process");
        channel.notice(UNAVAILABLE_NOTICE);
        true
    }

    /// Whether the notice has been written.
    pub fn has_fired(&self) -> bool
    {
        self.fired.load(Ordering::Acquire)
    }
}

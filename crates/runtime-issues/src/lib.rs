//! # runtime-issues
//!
//! Surface "soft" runtime warnings in the debugger while developing.
//!
//! Xcode highlights log messages as *runtime issues* when they are emitted at
//! fault level, on the `com.apple.runtime-issues` subsystem, and attributed to
//! a trusted system image. This crate wires those three facilities together:
//!
//! - **Image lookup** ([`image`]): finds the header of a trusted loaded image
//!   once per process.
//! - **Call-site deduplication** ([`callsite`]): each `(file, line)` reports at
//!   most once per [`Logger`], so a hot loop does not flood the console.
//! - **Orchestration** ([`Logger::raise`]): the guard chain that decides
//!   whether an issue is emitted at all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runtime_issues::{raise_issue, runtime_issue, Logger};
//!
//! let value = -1;
//! runtime_issue!("value must be positive, got {value}");
//!
//! let layout = Logger::new("Layout");
//! raise_issue!(layout, "constraint conflict on {}", "header");
//! ```
//!
//! ## Build configurations
//!
//! Everything is gated on [`DEVELOPMENT_BUILD`] (`debug_assertions`). In
//! release builds the macros expand to a constant-false branch and
//! [`Logger::raise`] returns before touching any state.
//!
//! ## Platform Support
//!
//! - **macOS**: `dyld` image enumeration and `os_log` (see [`platform::macos`])
//! - **Linux/Android**: `dl_iterate_phdr` image enumeration, issues go to `tracing`
//! - **Others**: no image source; the one-time fallback notice fires instead

#![allow(unsafe_code)] // Required for dyld, dl_iterate_phdr and os_log FFI

pub mod callsite;
pub mod channel;
pub mod config;
pub mod error;
pub mod fallback;
pub mod image;
pub mod logger;
pub mod platform;

pub use callsite::{CallSite, CallsiteCache};
pub use channel::{LogChannel, Severity, TracingChannel};
pub use config::Config;
pub use error::{IssueError, IssueResult};
pub use fallback::{runtime_issues_unavailable, FallbackNotice};
pub use image::{locate_image, ImageHandle, ImageLocator, ImageSource, LoadedImage, LoadedImages};
pub use logger::{Logger, LoggerBuilder};

/// Whether this is a development build.
///
/// Follows `debug_assertions`. When `false`, every raise is a no-op and
/// [`Logger::set_enabled`] cannot turn logging back on.
pub const DEVELOPMENT_BUILD: bool = cfg!(debug_assertions);

/// Raise a runtime issue on the shared default [`Logger`].
///
/// Accepts the same arguments as [`format!`]. The call site is captured with
/// `file!()` and `line!()`, so each invocation reports once.
///
/// ```rust,no_run
/// use runtime_issues::runtime_issue;
///
/// for attempt in 0..3 {
///     // Shows up once, not three times.
///     runtime_issue!("retrying without a backoff (attempt {attempt})");
/// }
/// ```
#[macro_export]
macro_rules! runtime_issue {
    ($($arg:tt)+) => {
        $crate::raise_issue!($crate::Logger::shared(), $($arg)+)
    };
}

/// Raise a runtime issue on a specific [`Logger`].
///
/// ```rust,no_run
/// use runtime_issues::{raise_issue, Logger};
///
/// let logger = Logger::new("Networking");
/// raise_issue!(logger, "request sent on the main thread: {}", "/feed");
/// ```
#[macro_export]
macro_rules! raise_issue {
    ($logger:expr, $($arg:tt)+) => {
        if $crate::DEVELOPMENT_BUILD {
            $logger.raise(
                $crate::CallSite::new(::core::file!(), ::core::line!()),
                ::core::format_args!($($arg)+),
            )
        }
    };
}

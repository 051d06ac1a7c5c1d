//! # Log Channels
//!
//! Where a raised issue ends up.
//!
//! A [`LogChannel`] is one subsystem/category pair of the OS log. On macOS
//! that is an `os_log_t` ([`crate::platform::macos::OsLogChannel`]); on every
//! other platform issues are emitted as `tracing` events by
//! [`TracingChannel`].

use std::ffi::CString;
use std::sync::Arc;

use tracing::{event, Level};

use crate::error::{IssueError, IssueResult};
use crate::image::ImageHandle;

/// Target of the events emitted by [`TracingChannel`].
pub const TRACING_TARGET: &str = "runtime_issues";

/// Log message type
///
/// Values match `os_log_type_t` so they can be passed to the OS unchanged.
/// Runtime issues always use [`Severity::Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Severity
{
    /// `OS_LOG_TYPE_DEFAULT`
    Default = 0x00,
    /// `OS_LOG_TYPE_INFO`
    Info = 0x01,
    /// `OS_LOG_TYPE_DEBUG`
    Debug = 0x02,
    /// `OS_LOG_TYPE_ERROR`
    Error = 0x10,
    /// `OS_LOG_TYPE_FAULT`
    Fault = 0x11,
}

impl Severity
{
    /// Raw `os_log_type_t` value.
    pub const fn as_raw(self) -> u8
    {
        self as u8
    }

    /// Closest `tracing` level.
    pub const fn level(self) -> Level
    {
        match self {
            Severity::Fault | Severity::Error => Level::ERROR,
            Severity::Default | Severity::Info => Level::INFO,
            Severity::Debug => Level::DEBUG,
        }
    }
}

/// One named log channel
///
/// Implementations must be cheap to query: [`LogChannel::is_enabled`] runs
/// on every raise before the message is formatted.
pub trait LogChannel: Send + Sync
{
    /// Whether anything is observing messages of `severity` on this channel.
    fn is_enabled(&self, severity: Severity) -> bool;

    /// Emit `message` attributed to `image`.
    fn emit(&self, image: ImageHandle, severity: Severity, message: &str);

    /// Emit `message` without attribution.
    ///
    /// Used for the one-time notice when no trusted image could be found.
    fn notice(&self, message: &str);
}

impl<T: LogChannel + ?Sized> LogChannel for Arc<T>
{
    fn is_enabled(&self, severity: Severity) -> bool
    {
        (**self).is_enabled(severity)
    }

    fn emit(&self, image: ImageHandle, severity: Severity, message: &str)
    {
        (**self).emit(image, severity, message);
    }

    fn notice(&self, message: &str)
    {
        (**self).notice(message);
    }
}

impl<T: LogChannel + ?Sized> LogChannel for Box<T>
{
    fn is_enabled(&self, severity: Severity) -> bool
    {
        (**self).is_enabled(severity)
    }

    fn emit(&self, image: ImageHandle, severity: Severity, message: &str)
    {
        (**self).emit(image, severity, message);
    }

    fn notice(&self, message: &str)
    {
        (**self).notice(message);
    }
}

/// Check that a subsystem or category can be handed to the OS as a C string.
///
/// ## Errors
///
/// Returns [`IssueError::InvalidLabel`] if `label` contains a NUL byte.
pub fn c_label(kind: &'static str, label: &str) -> IssueResult<CString>
{
    CString::new(label).map_err(|_| IssueError::InvalidLabel {
        kind,
        label: label.to_string(),
    })
}

/// Channel that emits issues as `tracing` events
///
/// Events use the `runtime_issues` target and carry `subsystem`, `category`
/// and (for issues) `image` fields. Whether the channel is enabled follows the
/// installed subscriber's filter.
#[derive(Debug, Clone)]
pub struct TracingChannel
{
    subsystem: String,
    category: String,
}

impl TracingChannel
{
    pub fn new(subsystem: impl Into<String>, category: impl Into<String>) -> Self
    {
        Self {
            subsystem: subsystem.into(),
            category: category.into(),
        }
    }

    pub fn subsystem(&self) -> &str
    {
        &self.subsystem
    }

    pub fn category(&self) -> &str
    {
        &self.category
    }
}

impl LogChannel for TracingChannel
{
    fn is_enabled(&self, severity: Severity) -> bool
    {
        match severity.level() {
            Level::ERROR => tracing::enabled!(target: TRACING_TARGET, Level::ERROR),
            Level::INFO => tracing::enabled!(target: TRACING_TARGET, Level::INFO),
            _ => tracing::enabled!(target: TRACING_TARGET, Level::DEBUG),
        }
    }

    fn emit(&self, image: ImageHandle, severity: Severity, message: &str)
    {
        let subsystem = self.subsystem.as_str();
        let category = self.category.as_str();
        match severity.level() {
            Level::ERROR => event!(target: TRACING_TARGET, Level::ERROR, subsystem, category, %image, "{message}"),
            Level::INFO => event!(target: TRACING_TARGET, Level::INFO, subsystem, category, %image, "{message}"),
            _ => event!(target: TRACING_TARGET, Level::DEBUG, subsystem, category, %image, "{message}"),
        }
    }

    fn notice(&self, message: &str)
    {
        let subsystem = self.subsystem.as_str();
        let category = self.category.as_str();
        event!(target: TRACING_TARGET, Level::ERROR, subsystem, category, "{message}");
    }
}

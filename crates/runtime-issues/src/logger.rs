//! # Runtime Issue Logger
//!
//! A [`Logger`] is one category of runtime issues. It owns the channel issues
//! are written to and the set of call sites that have already raised.
//!
//! ## Raising
//!
//! [`Logger::raise`] walks a fixed chain of guards and stops at the first one
//! that fails:
//!
//! 1. not a development build
//! 2. logger disabled
//! 3. nothing observes fault messages on the channel
//! 4. this call site already raised
//! 5. no trusted image (writes the one-time fallback notice)
//!
//! Only then is the message formatted and emitted. None of these outcomes is
//! reported back to the caller.
//!
//! The enabled check comes before the call-site check, so raising while
//! disabled does not use up the call site.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{trace, warn};

use crate::callsite::{CallSite, CallsiteCache};
use crate::channel::{LogChannel, Severity, TracingChannel};
use crate::config::Config;
use crate::error::IssueResult;
use crate::fallback::FallbackNotice;
use crate::image::ImageLocator;
use crate::{platform, DEVELOPMENT_BUILD};

static SHARED: Lazy<Logger> = Lazy::new(|| Logger::new(Config::process().default_category.clone()));

/// A category of runtime issues with its own call-site memory
///
/// ## Example
///
/// ```rust,no_run
/// use runtime_issues::{raise_issue, Logger};
///
/// let logger = Logger::new("Persistence");
/// raise_issue!(logger, "saving on the main thread ({} bytes)", 4096);
///
/// logger.set_enabled(false);
/// raise_issue!(logger, "not emitted, and this call site stays unused");
/// ```
pub struct Logger
{
    category: String,
    channel: Box<dyn LogChannel>,
    callsites: CallsiteCache,
    enabled: AtomicBool,
    images: Arc<ImageLocator>,
    fallback: Arc<FallbackNotice>,
}

impl fmt::Debug for Logger
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Logger")
            .field("category", &self.category)
            .field("enabled", &self.is_enabled())
            .field("callsites", &self.callsites.len())
            .field("images", &self.images)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl Logger
{
    /// The shared logger used by [`crate::runtime_issue!`].
    ///
    /// Its category is `"Runtime issues"` unless overridden through
    /// `RUNTIME_ISSUES_CATEGORY`.
    pub fn shared() -> &'static Logger
    {
        &SHARED
    }

    /// Create a logger for `category` on the native channel.
    ///
    /// If the native channel cannot be opened the logger writes to a
    /// [`TracingChannel`] instead; use [`Logger::try_new`] to see the error.
    pub fn new(category: impl Into<String>) -> Self
    {
        Self::builder(category).build()
    }

    /// Create a logger for `category`, failing if the native channel cannot
    /// be opened.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::IssueError::InvalidLabel`] for labels containing NUL,
    /// or [`crate::IssueError::ChannelUnavailable`] if the OS refuses the
    /// channel.
    pub fn try_new(category: impl Into<String>) -> IssueResult<Self>
    {
        Self::builder(category).try_build()
    }

    /// Start configuring a logger for `category`.
    pub fn builder(category: impl Into<String>) -> LoggerBuilder
    {
        LoggerBuilder::new(category)
    }

    pub fn category(&self) -> &str
    {
        &self.category
    }

    /// Whether raises are executed. Always `false` outside development builds.
    pub fn is_enabled(&self) -> bool
    {
        DEVELOPMENT_BUILD && self.enabled.load(Ordering::Relaxed)
    }

    /// Turn raising on or off. Has no effect outside development builds.
    pub fn set_enabled(&self, enabled: bool)
    {
        if DEVELOPMENT_BUILD {
            self.enabled.store(enabled, Ordering::Relaxed);
        }
    }

    /// Whether `site` has already raised on this logger.
    pub fn has_raised(&self, site: &CallSite) -> bool
    {
        self.callsites.contains(site)
    }

    /// Raise a runtime issue from `site`.
    ///
    /// Prefer [`crate::raise_issue!`], which captures the call site and
    /// builds `args` for you.
    pub fn raise(&self, site: CallSite, args: fmt::Arguments<'_>)
    {
        if !DEVELOPMENT_BUILD || !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        if !self.channel.is_enabled(Severity::Fault) {
            return;
        }
        if !self.callsites.should_raise(site) {
            trace!(category = %self.category, %site, "Suppressed repeated runtime issue");
            return;
        }

        let Some(image) = self.images.resolve() else {
            self.fallback.notify(&*self.channel);
            return;
        };

        let message = fmt::format(args);
        self.channel.emit(image, Severity::Fault, &message);
    }
}

/// Builder for [`Logger`]
///
/// Anything left unset comes from the process: the native channel on the
/// configured subsystem, [`ImageLocator::system`], [`FallbackNotice::process`]
/// and the configured enabled state.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use runtime_issues::{ImageLocator, Logger, TracingChannel};
///
/// let logger = Logger::builder("Test")
///     .channel(TracingChannel::new("com.example", "Test"))
///     .images(Arc::new(ImageLocator::resolved(None)))
///     .enabled(false)
///     .build();
/// assert!(!logger.is_enabled());
/// ```
pub struct LoggerBuilder
{
    category: String,
    subsystem: Option<String>,
    channel: Option<Box<dyn LogChannel>>,
    images: Option<Arc<ImageLocator>>,
    fallback: Option<Arc<FallbackNotice>>,
    enabled: Option<bool>,
}

impl fmt::Debug for LoggerBuilder
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("LoggerBuilder")
            .field("category", &self.category)
            .field("subsystem", &self.subsystem)
            .field("channel", &self.channel.is_some())
            .field("images", &self.images)
            .field("fallback", &self.fallback)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl LoggerBuilder
{
    pub fn new(category: impl Into<String>) -> Self
    {
        Self {
            category: category.into(),
            subsystem: None,
            channel: None,
            images: None,
            fallback: None,
            enabled: None,
        }
    }

    /// Subsystem for the native channel. Ignored if a channel is supplied.
    #[must_use]
    pub fn subsystem(mut self, subsystem: impl Into<String>) -> Self
    {
        self.subsystem = Some(subsystem.into());
        self
    }

    /// Write issues to `channel` instead of the native channel.
    #[must_use]
    pub fn channel(mut self, channel: impl LogChannel + 'static) -> Self
    {
        self.channel = Some(Box::new(channel));
        self
    }

    /// Resolve the trusted image through `images`.
    #[must_use]
    pub fn images(mut self, images: Arc<ImageLocator>) -> Self
    {
        self.images = Some(images);
        self
    }

    /// Gate the fallback notice with `fallback` instead of the process gate.
    #[must_use]
    pub fn fallback(mut self, fallback: Arc<FallbackNotice>) -> Self
    {
        self.fallback = Some(fallback);
        self
    }

    /// Initial enabled state.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self
    {
        self.enabled = Some(enabled);
        self
    }

    /// Build the logger, falling back to a [`TracingChannel`] if the native
    /// channel cannot be opened.
    pub fn build(mut self) -> Logger
    {
        let channel = match self.channel.take() {
            Some(channel) => channel,
            None => {
                let subsystem = self.subsystem_or_default();
                platform::native_channel(&subsystem, &self.category).unwrap_or_else(|err| {
                    warn!(error = %err, category = %self.category, "Falling back to tracing channel");
                    Box::new(TracingChannel::new(subsystem, self.category.clone()))
                })
            }
        };
        self.finish(channel)
    }

    /// Build the logger.
    ///
    /// ## Errors
    ///
    /// Returns the error from opening the native channel, if no channel was
    /// supplied.
    pub fn try_build(mut self) -> IssueResult<Logger>
    {
        let channel = match self.channel.take() {
            Some(channel) => channel,
            None => platform::native_channel(&self.subsystem_or_default(), &self.category)?,
        };
        Ok(self.finish(channel))
    }

    fn subsystem_or_default(&self) -> String
    {
        self.subsystem
            .clone()
            .unwrap_or_else(|| Config::process().subsystem.clone())
    }

    fn finish(self, channel: Box<dyn LogChannel>) -> Logger
    {
        Logger {
            category: self.category,
            channel,
            callsites: CallsiteCache::new(),
            enabled: AtomicBool::new(self.enabled.unwrap_or_else(|| Config::process().enabled)),
            images: self.images.unwrap_or_else(ImageLocator::system),
            fallback: self.fallback.unwrap_or_else(FallbackNotice::process),
        }
    }
}

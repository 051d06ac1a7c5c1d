//! # Error Types
//!
//! Errors for the fallible corners of the crate.
//!
//! Raising an issue never fails: every guard in [`crate::Logger::raise`] is a
//! silent no-op. These errors only come out of constructors that open an OS
//! log channel or read configuration, so callers that want to know why a
//! channel could not be opened can ask.

use thiserror::Error;

/// Error type for channel construction and configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError
{
    /// A subsystem or category label cannot be passed to the OS
    ///
    /// `os_log` takes C strings, so labels with an interior NUL byte are
    /// rejected on every platform to keep loggers portable.
    #[error("Invalid {kind} label {label:?}: contains a NUL byte")]
    InvalidLabel
    {
        /// Which label was rejected (`subsystem` or `category`)
        kind: &'static str,
        /// The rejected label
        label: String,
    },

    /// The OS refused to create a log object for this subsystem/category
    #[error("Log channel unavailable for {subsystem}/{category}")]
    ChannelUnavailable
    {
        /// Subsystem the channel was requested for
        subsystem: String,
        /// Category the channel was requested for
        category: String,
    },

    /// An environment override could not be parsed
    #[error("Invalid value {value:?} for {key}")]
    InvalidConfig
    {
        /// Environment variable name
        key: &'static str,
        /// The value that failed to parse
        value: String,
    },
}

/// Convenience type alias for `Result<T, IssueError>`
///
/// ```rust
/// use runtime_issues::error::IssueResult;
/// fn foo() -> IssueResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type IssueResult<T> = std::result::Result<T, IssueError>;

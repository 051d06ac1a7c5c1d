//! # Platform-Specific Implementations
//!
//! Native image enumeration and log channels.
//!
//! - **macOS**: `dyld` for images, `os_log` for the channel
//!   - See: [Logging](https://developer.apple.com/documentation/os/logging)
//! - **Linux/Android**: `dl_iterate_phdr` for images, [`TracingChannel`] for the channel
//!   - See: [dl_iterate_phdr(3) man page](https://man7.org/linux/man-pages/man3/dl_iterate_phdr.3.html)
//! - **Others**: no images (every raise takes the fallback path), [`TracingChannel`]

use crate::channel::LogChannel;
#[cfg(not(target_os = "macos"))]
use crate::channel::{c_label, TracingChannel};
use crate::error::IssueResult;
#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "android")))]
use crate::image::LoadedImages;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod linux;

/// Images loaded in this process, in loader order.
#[cfg(target_os = "macos")]
pub fn native_images() -> macos::DyldImages
{
    macos::DyldImages
}

/// Images loaded in this process, in loader order.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn native_images() -> crate::image::LoadedImages
{
    linux::snapshot()
}

/// Images loaded in this process, in loader order.
#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "android")))]
pub fn native_images() -> LoadedImages
{
    LoadedImages::default()
}

/// Open the native channel for `subsystem`/`category`.
///
/// ## Errors
///
/// Returns [`crate::IssueError::InvalidLabel`] if either label contains a NUL
/// byte, or [`crate::IssueError::ChannelUnavailable`] if the OS refuses to
/// create the log object.
#[cfg(target_os = "macos")]
pub fn native_channel(subsystem: &str, category: &str) -> IssueResult<Box<dyn LogChannel>>
{
    Ok(Box::new(macos::OsLogChannel::new(subsystem, category)?))
}

/// Open the native channel for `subsystem`/`category`.
///
/// Labels are checked the same way `os_log` would, so a logger that works
/// here also works on macOS.
///
/// ## Errors
///
/// Returns [`crate::IssueError::InvalidLabel`] if either label contains a NUL
/// byte.
#[cfg(not(target_os = "macos"))]
pub fn native_channel(subsystem: &str, category: &str) -> IssueResult<Box<dyn LogChannel>>
{
    c_label("subsystem", subsystem)?;
    c_label("category", category)?;
    Ok(Box::new(TracingChannel::new(subsystem, category)))
}

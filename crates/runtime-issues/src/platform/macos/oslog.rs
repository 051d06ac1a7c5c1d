//! # `os_log` Channel
//!
//! Writes runtime issues where Xcode looks for them.
//!
//! Xcode shows a log message as a runtime issue when:
//!
//! 1. it is attributed to a system image (the `dso` argument),
//! 2. its subsystem is `com.apple.runtime-issues`,
//! 3. its type is fault.
//!
//! Messages are formatted in Rust and passed as a single public string
//! argument to a `%{public}s` format, so nothing is redacted.

use std::ffi::{c_char, c_void, CString};
use std::mem::size_of;

use super::ffi::{
    _os_log_impl, os_log_create, os_log_t, os_log_type_enabled, os_release, OS_LOG_ARG_PUBLIC, OS_LOG_ARG_TYPE_STRING,
    OS_LOG_BUFFER_HAS_NON_SCALAR,
};
use crate::channel::{c_label, LogChannel, Severity};
use crate::error::{IssueError, IssueResult};
use crate::image::ImageHandle;

const PUBLIC_STRING_FORMAT: &[u8] = b"%{public}s\0";

const POINTER_SIZE: usize = size_of::<*const c_char>();
#[allow(clippy::cast_possible_truncation)]
const POINTER_SIZE_BYTE: u8 = POINTER_SIZE as u8;

/// Encoded arguments for one `%{public}s`: summary, count, descriptor, size, pointer.
type StringArgument = [u8; 4 + POINTER_SIZE];

/// Encode `string` as the only argument of an `_os_log_impl` buffer.
///
/// The pointer is stored, not the bytes, so `string` must outlive the call.
fn encode_string_argument(string: *const c_char) -> StringArgument
{
    let mut buffer = [0u8; 4 + POINTER_SIZE];
    buffer[0] = OS_LOG_BUFFER_HAS_NON_SCALAR;
    buffer[1] = 1;
    buffer[2] = OS_LOG_ARG_TYPE_STRING | OS_LOG_ARG_PUBLIC;
    buffer[3] = POINTER_SIZE_BYTE;
    buffer[4..].copy_from_slice(&(string as usize).to_ne_bytes());
    buffer
}

/// Convert a message to a C string, replacing interior NULs.
fn message_cstring(message: &str) -> CString
{
    CString::new(message.replace('\0', "\u{FFFD}")).unwrap_or_default()
}

/// One `os_log_t` for a subsystem/category pair
#[derive(Debug)]
pub struct OsLogChannel
{
    log: os_log_t,
}

// SAFETY: `os_log_t` objects are immutable after creation and documented as
// usable from any thread.
unsafe impl Send for OsLogChannel {}
unsafe impl Sync for OsLogChannel {}

impl OsLogChannel
{
    /// Create the log object for `subsystem`/`category`.
    ///
    /// ## Errors
    ///
    /// Returns [`IssueError::InvalidLabel`] if a label contains NUL, or
    /// [`IssueError::ChannelUnavailable`] if `os_log_create` returns null.
    pub fn new(subsystem: &str, category: &str) -> IssueResult<Self>
    {
        let c_subsystem = c_label("subsystem", subsystem)?;
        let c_category = c_label("category", category)?;

        // SAFETY: both arguments are valid NUL-terminated strings for the call.
        let log = unsafe { os_log_create(c_subsystem.as_ptr(), c_category.as_ptr()) };
        if log.is_null() {
            return Err(IssueError::ChannelUnavailable {
                subsystem: subsystem.to_string(),
                category: category.to_string(),
            });
        }

        Ok(Self { log })
    }

    fn write(&self, dso: *const c_void, severity: Severity, message: &str)
    {
        let message = message_cstring(message);
        let mut buffer = encode_string_argument(message.as_ptr());

        // SAFETY: `dso` is a loaded image header, `self.log` is a live log
        // object, the format is NUL-terminated and `buffer` points at
        // `message`, which outlives the call.
        unsafe {
            _os_log_impl(
                dso.cast_mut(),
                self.log,
                severity.as_raw(),
                PUBLIC_STRING_FORMAT.as_ptr().cast::<c_char>(),
                buffer.as_mut_ptr(),
                buffer.len() as u32,
            );
        }
    }
}

impl Drop for OsLogChannel
{
    fn drop(&mut self)
    {
        // SAFETY: `self.log` came from `os_log_create` and is released once.
        unsafe { os_release(self.log) };
    }
}

impl LogChannel for OsLogChannel
{
    fn is_enabled(&self, severity: Severity) -> bool
    {
        // SAFETY: `self.log` is a live log object.
        unsafe { os_log_type_enabled(self.log, severity.as_raw()) }
    }

    fn emit(&self, image: ImageHandle, severity: Severity, message: &str)
    {
        self.write(image.as_ptr(), severity, message);
    }

    fn notice(&self, message: &str)
    {
        // Attributed to the main executable rather than a system image, so
        // Xcode shows it as a plain fault message.
        // SAFETY: index 0 is the main executable, or null if unavailable.
        let main = unsafe { libc::_dyld_get_image_header(0) };
        if main.is_null() {
            return;
        }
        self.write(main.cast::<c_void>(), Severity::Fault, message);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_encode_string_argument()
    {
        let message = CString::new("x=5").unwrap();
        let buffer = encode_string_argument(message.as_ptr());

        assert_eq!(buffer[0], 0x02);
        assert_eq!(buffer[1], 1);
        assert_eq!(buffer[2], 0x22);
        assert_eq!(buffer[3] as usize, POINTER_SIZE);
        assert_eq!(&buffer[4..], &(message.as_ptr() as usize).to_ne_bytes());
    }

    #[test]
    fn test_message_cstring_replaces_nul()
    {
        assert_eq!(message_cstring("a\0b").to_str().unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn test_rejects_nul_category()
    {
        let err = OsLogChannel::new("com.apple.runtime-issues", "bad\0").unwrap_err();
        assert!(matches!(err, IssueError::InvalidLabel { kind: "category", .. }));
    }

    #[test]
    fn test_create_channel()
    {
        assert!(OsLogChannel::new("com.apple.runtime-issues", "Test").is_ok());
    }
}

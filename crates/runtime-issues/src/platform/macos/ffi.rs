//! # macOS Unified Logging FFI Declarations
//!
//! `os_log` entry points that the `libc` crate does not bind. `dyld` image
//! enumeration (`_dyld_image_count`, `_dyld_get_image_name`,
//! `_dyld_get_image_header`) comes from `libc` directly.
//!
//! All of these live in `libSystem`, which every binary links.
//!
//! ## References
//!
//! - [os/log.h](https://github.com/apple-oss-distributions/libtrace) (`os_log_create`, `os_log_type_enabled`)
//! - [os/trace_base.h](https://github.com/apple-oss-distributions/libtrace) (`_os_log_impl` buffer layout)

// Allow doc comments in extern blocks - they're useful for developers even if rustdoc doesn't generate docs
#![allow(unused_doc_comments)]
#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_void};

/// Opaque `os_log_t` object.
pub type os_log_t = *mut c_void;

/// `os_log_type_t`, see [`crate::Severity`] for the values.
pub type os_log_type_t = u8;

/// Buffer summary flag: the buffer holds a pointer-sized (non-scalar) argument.
pub const OS_LOG_BUFFER_HAS_NON_SCALAR: u8 = 0x02;

/// Argument descriptor: a C string.
pub const OS_LOG_ARG_TYPE_STRING: u8 = 0x20;

/// Argument descriptor flag: value is public (not redacted).
pub const OS_LOG_ARG_PUBLIC: u8 = 0x02;

#[link(name = "System", kind = "dylib")]
extern "C" {
    /// Create a log object for a subsystem and category
    ///
    /// ## Returns
    ///
    /// A log object usable from any thread. Null is treated as unavailable.
    pub fn os_log_create(subsystem: *const c_char, category: *const c_char) -> os_log_t;

    /// Whether messages of `type` would currently be recorded on `oslog`.
    pub fn os_log_type_enabled(oslog: os_log_t, r#type: os_log_type_t) -> bool;

    /// Emit a pre-encoded log message
    ///
    /// This is what the `os_log` macros expand to. `dso` attributes the
    /// message to an image and must point at a loaded Mach-O header. The return
    /// address recorded with the message is taken by the function itself.
    ///
    /// ## Parameters
    ///
    /// - `dso`: Header of the image the message is attributed to
    /// - `log`: Log object from `os_log_create`
    /// - `type`: Message type (`os_log_type_t`)
    /// - `format`: printf-style format, `%{public}s` here
    /// - `buf`: Encoded arguments for `format`
    /// - `size`: Length of `buf` in bytes
    pub fn _os_log_impl(
        dso: *mut c_void,
        log: os_log_t,
        r#type: os_log_type_t,
        format: *const c_char,
        buf: *mut u8,
        size: u32,
    );

    /// Release a log object from `os_log_create`.
    pub fn os_release(object: *mut c_void);
}

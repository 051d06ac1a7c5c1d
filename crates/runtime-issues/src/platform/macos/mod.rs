//! # macOS Implementation
//!
//! Runtime issues on macOS go through unified logging.
//!
//! ## Key APIs Used
//!
//! - `_dyld_image_count()`, `_dyld_get_image_name()`, `_dyld_get_image_header()`:
//!   walk the loaded images (from the `libc` crate)
//! - `os_log_create()`, `os_log_type_enabled()`: open a channel and check
//!   whether fault messages are being observed (declared in [`ffi`])
//! - `_os_log_impl()`: emit a message attributed to a specific image
//!   (declared in [`ffi`])
//!
//! ## References
//!
//! - [Logging](https://developer.apple.com/documentation/os/logging)
//! - [dyld(3) man page](https://developer.apple.com/library/archive/documentation/System/Conceptual/ManPages_iPhoneOS/man3/dyld.3.html)

pub mod ffi;
pub mod images;
pub mod oslog;

pub use images::DyldImages;
pub use oslog::OsLogChannel;

//! `dyld` image enumeration.

use std::borrow::Cow;
use std::ffi::CStr;

use crate::image::{ImageHandle, ImageSource};

/// The images `dyld` has loaded into this process
///
/// Reads `dyld`'s live list on every call, so an index can disappear between
/// [`ImageSource::image_count`] and the per-index lookups; those return
/// `None` in that case.
#[derive(Debug, Clone, Copy, Default)]
pub struct DyldImages;

impl ImageSource for DyldImages
{
    fn image_count(&self) -> usize
    {
        // SAFETY: no preconditions.
        unsafe { libc::_dyld_image_count() as usize }
    }

    fn image_name(&self, index: usize) -> Option<Cow<'_, str>>
    {
        let index = u32::try_from(index).ok()?;
        // SAFETY: out-of-range indices return null.
        let name = unsafe { libc::_dyld_get_image_name(index) };
        if name.is_null() {
            return None;
        }
        // SAFETY: non-null names are NUL-terminated and owned by dyld. Copied
        // out immediately since the image may be unloaded later.
        let name = unsafe { CStr::from_ptr(name) };
        Some(Cow::Owned(name.to_string_lossy().into_owned()))
    }

    fn image_header(&self, index: usize) -> Option<ImageHandle>
    {
        let index = u32::try_from(index).ok()?;
        // SAFETY: out-of-range indices return null.
        ImageHandle::from_ptr(unsafe { libc::_dyld_get_image_header(index) })
    }
}

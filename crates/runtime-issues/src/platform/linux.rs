//! # Linux Image Enumeration
//!
//! Loaded objects come from `dl_iterate_phdr`, which only offers a callback
//! walk, so they are copied into a [`LoadedImages`] snapshot. The handle of
//! each object is its load address (`dlpi_addr`); the main executable of a
//! non-PIE binary loads at 0 and therefore has no handle.

use std::ffi::{c_int, c_void, CStr};

use crate::image::{ImageHandle, LoadedImage, LoadedImages};

/// Copy the list of loaded objects.
pub fn snapshot() -> LoadedImages
{
    let mut images: Vec<LoadedImage> = Vec::new();
    // SAFETY: `collect` only touches `data` as the `Vec` passed here, and
    // `dl_iterate_phdr` calls it synchronously before returning.
    unsafe {
        libc::dl_iterate_phdr(Some(collect), (&mut images as *mut Vec<LoadedImage>).cast::<c_void>());
    }
    LoadedImages::new(images)
}

unsafe extern "C" fn collect(info: *mut libc::dl_phdr_info, _size: libc::size_t, data: *mut c_void) -> c_int
{
    // SAFETY: `data` is the `Vec` from `snapshot`; `info` is valid for the
    // duration of the callback.
    let (images, info) = unsafe { (&mut *data.cast::<Vec<LoadedImage>>(), &*info) };

    let name = if info.dlpi_name.is_null() {
        String::new()
    } else {
        // SAFETY: non-null `dlpi_name` is a NUL-terminated string owned by the loader.
        unsafe { CStr::from_ptr(info.dlpi_name) }.to_string_lossy().into_owned()
    };

    #[allow(clippy::cast_possible_truncation)]
    images.push(LoadedImage::new(name, ImageHandle::from_address(info.dlpi_addr as usize)));
    0
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::image::{locate_image, ImageSource};

    #[cfg(target_env = "gnu")]
    #[test]
    fn test_snapshot_lists_libc()
    {
        let images = snapshot();
        assert!(!images.is_empty());
        assert!(images.iter().any(|image| image.name.contains("libc")));
    }

    #[cfg(target_env = "gnu")]
    #[test]
    fn test_locate_libc()
    {
        let images = snapshot();
        let handle = locate_image(&images, "libc");
        assert!(handle.is_some());
        assert!(images.image_count() >= 1);
    }
}

//! # Loaded Image Lookup
//!
//! Finds the header of a trusted image loaded in this process.
//!
//! The debugger only promotes fault messages to runtime issues when they are
//! attributed to a system image. The lookup walks the images in the order the
//! loader reports them and takes the first whose name contains a substring
//! (`"SwiftUI"` on macOS, see [`crate::Config`]).
//!
//! Not finding one is normal on platforms or configurations without that
//! image; the caller takes the fallback path instead.
//!
//! ## Usage
//!
//! ```rust
//! use runtime_issues::{locate_image, ImageHandle, LoadedImage, LoadedImages};
//!
//! let images = LoadedImages::new(vec![
//!     LoadedImage::new("/usr/lib/libobjc.A.dylib", ImageHandle::from_address(0x1000)),
//!     LoadedImage::new("/System/Library/Frameworks/SwiftUI.framework/SwiftUI", ImageHandle::from_address(0x2000)),
//! ]);
//!
//! let handle = locate_image(&images, "SwiftUI");
//! assert_eq!(handle.map(ImageHandle::address), Some(0x2000));
//! ```

use std::borrow::Cow;
use std::ffi::c_void;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use tracing::debug;

use crate::config::Config;
use crate::platform;

/// Opaque handle to a loaded image: the address of its header
///
/// Never null. It is only handed back to the OS log primitive and never
/// dereferenced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(NonZeroUsize);

impl ImageHandle
{
    /// Create a handle from a header address, `None` for null.
    pub const fn from_address(address: usize) -> Option<Self>
    {
        match NonZeroUsize::new(address) {
            Some(address) => Some(Self(address)),
            None => None,
        }
    }

    /// Create a handle from a header pointer, `None` for null.
    pub fn from_ptr<T>(header: *const T) -> Option<Self>
    {
        Self::from_address(header as usize)
    }

    /// Header address as an integer.
    pub const fn address(self) -> usize
    {
        self.0.get()
    }

    /// Header address as a raw pointer, for passing back to the OS.
    pub fn as_ptr(self) -> *const c_void
    {
        self.0.get() as *const c_void
    }
}

impl fmt::Display for ImageHandle
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.address())
    }
}

/// Ordered view over the images loaded in a process
///
/// Mirrors `dyld`'s index-based API: a count, then a name and header per
/// index. Either lookup may return `None` when the image at that index went
/// away between calls.
pub trait ImageSource
{
    /// Number of images currently loaded.
    fn image_count(&self) -> usize;

    /// Path or install name of the image at `index`.
    fn image_name(&self, index: usize) -> Option<Cow<'_, str>>;

    /// Header of the image at `index`.
    fn image_header(&self, index: usize) -> Option<ImageHandle>;
}

/// Find the first image whose name contains `needle`.
///
/// Images are visited in loader order and the scan stops at the first name
/// that matches, even if that image has no usable header.
pub fn locate_image<S: ImageSource + ?Sized>(source: &S, needle: &str) -> Option<ImageHandle>
{
    let index = (0..source.image_count()).find(|&index| {
        source
            .image_name(index)
            .is_some_and(|name| name.contains(needle))
    })?;
    source.image_header(index)
}

/// One entry of a [`LoadedImages`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage
{
    pub name: String,
    pub header: Option<ImageHandle>,
}

impl LoadedImage
{
    pub fn new(name: impl Into<String>, header: Option<ImageHandle>) -> Self
    {
        Self {
            name: name.into(),
            header,
        }
    }
}

/// Owned, ordered list of loaded images
///
/// Used where the OS only offers a callback-style walk (`dl_iterate_phdr`),
/// and handy for describing a process in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedImages(Vec<LoadedImage>);

impl LoadedImages
{
    #[must_use]
    pub fn new(images: Vec<LoadedImage>) -> Self
    {
        Self(images)
    }

    /// Copy every image out of `source`, skipping indices that vanished.
    pub fn from_source<S: ImageSource + ?Sized>(source: &S) -> Self
    {
        let images = (0..source.image_count())
            .filter_map(|index| {
                let name = source.image_name(index)?;
                Some(LoadedImage::new(name.into_owned(), source.image_header(index)))
            })
            .collect();
        Self(images)
    }

    /// Snapshot of the images loaded in this process right now.
    #[must_use]
    pub fn snapshot() -> Self
    {
        Self::from_source(&platform::native_images())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedImage>
    {
        self.0.iter()
    }

    pub fn len(&self) -> usize
    {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.0.is_empty()
    }
}

impl ImageSource for LoadedImages
{
    fn image_count(&self) -> usize
    {
        self.0.len()
    }

    fn image_name(&self, index: usize) -> Option<Cow<'_, str>>
    {
        self.0.get(index).map(|image| Cow::Borrowed(image.name.as_str()))
    }

    fn image_header(&self, index: usize) -> Option<ImageHandle>
    {
        self.0.get(index).and_then(|image| image.header)
    }
}

static SYSTEM_LOCATOR: Lazy<Arc<ImageLocator>> =
    Lazy::new(|| Arc::new(ImageLocator::new(Config::process().trusted_image.clone())));

/// Memoized trusted-image lookup
///
/// The scan runs at most once per locator, even when several threads ask for
/// the handle at the same time; every caller sees the same result afterwards.
#[derive(Debug)]
pub struct ImageLocator
{
    needle: String,
    handle: OnceCell<Option<ImageHandle>>,
}

impl ImageLocator
{
    /// Create a locator that will look for images whose name contains `needle`.
    pub fn new(needle: impl Into<String>) -> Self
    {
        Self {
            needle: needle.into(),
            handle: OnceCell::new(),
        }
    }

    /// Create a locator whose result is already known.
    #[must_use]
    pub fn resolved(handle: Option<ImageHandle>) -> Self
    {
        Self {
            needle: String::new(),
            handle: OnceCell::with_value(handle),
        }
    }

    /// The process-wide locator, configured from [`Config::process`].
    pub fn system() -> Arc<ImageLocator>
    {
        Arc::clone(&SYSTEM_LOCATOR)
    }

    pub fn needle(&self) -> &str
    {
        &self.needle
    }

    /// Resolve against the images loaded in this process.
    pub fn resolve(&self) -> Option<ImageHandle>
    {
        *self.handle.get_or_init(|| self.scan(&platform::native_images()))
    }

    /// Resolve against `source`; ignored if already resolved.
    pub fn resolve_with<S: ImageSource + ?Sized>(&self, source: &S) -> Option<ImageHandle>
    {
        *self.handle.get_or_init(|| self.scan(source))
    }

    /// The result so far, without triggering a scan.
    pub fn get(&self) -> Option<Option<ImageHandle>>
    {
        self.handle.get().copied()
    }

    fn scan<S: ImageSource + ?Sized>(&self, source: &S) -> Option<ImageHandle>
    {
        let handle = locate_image(source, &self.needle);
        match handle {
            Some(handle) => debug!(needle = %self.needle, image = %handle, "Located trusted image"),
            None => debug!(
                needle = %self.needle,
                images = source.image_count(),
                "No trusted image loaded"
            ),
        }
        handle
    }
}

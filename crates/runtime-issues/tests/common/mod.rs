//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use runtime_issues::{FallbackNotice, ImageHandle, ImageLocator, LogChannel, Logger, Severity};

/// One message written through [`RecordingChannel::emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission
{
    pub image: ImageHandle,
    pub severity: Severity,
    pub message: String,
}

/// Channel that records everything written to it
#[derive(Debug)]
pub struct RecordingChannel
{
    active: AtomicBool,
    queries: AtomicUsize,
    emissions: Mutex<Vec<Emission>>,
    notices: Mutex<Vec<String>>,
}

impl RecordingChannel
{
    pub fn new() -> Arc<Self>
    {
        Arc::new(Self {
            active: AtomicBool::new(true),
            queries: AtomicUsize::new(0),
            emissions: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        })
    }

    pub fn set_active(&self, active: bool)
    {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn queries(&self) -> usize
    {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn emissions(&self) -> Vec<Emission>
    {
        self.emissions.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String>
    {
        self.emissions().into_iter().map(|emission| emission.message).collect()
    }

    pub fn notices(&self) -> Vec<String>
    {
        self.notices.lock().unwrap().clone()
    }
}

impl LogChannel for RecordingChannel
{
    fn is_enabled(&self, _severity: Severity) -> bool
    {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.active.load(Ordering::SeqCst)
    }

    fn emit(&self, image: ImageHandle, severity: Severity, message: &str)
    {
        self.emissions.lock().unwrap().push(Emission {
            image,
            severity,
            message: message.to_string(),
        });
    }

    fn notice(&self, message: &str)
    {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

pub const TRUSTED_IMAGE: usize = 0x1_0000_0000;

pub fn trusted_image() -> ImageHandle
{
    ImageHandle::from_address(TRUSTED_IMAGE).unwrap()
}

/// Logger wired to `channel`, with a resolved image and a private fallback gate.
pub fn recording_logger(category: &str, channel: &Arc<RecordingChannel>) -> Logger
{
    Logger::builder(category)
        .channel(Arc::clone(channel))
        .images(Arc::new(ImageLocator::resolved(Some(trusted_image()))))
        .fallback(Arc::new(FallbackNotice::new()))
        .enabled(true)
        .build()
}

/// Logger wired to `channel` with no trusted image and the given fallback gate.
pub fn imageless_logger(category: &str, channel: &Arc<RecordingChannel>, fallback: &Arc<FallbackNotice>) -> Logger
{
    Logger::builder(category)
        .channel(Arc::clone(channel))
        .images(Arc::new(ImageLocator::resolved(None)))
        .fallback(Arc::clone(fallback))
        .enabled(true)
        .build()
}

/// A `'static` copy of `text` at a fresh address.
pub fn leaked(text: &str) -> &'static str
{
    Box::leak(text.to_string().into_boxed_str())
}

//! Tests for the process-wide fallback gate
//!
//! Kept in its own test binary so no other test can trip the process gate
//! first.

#![cfg(debug_assertions)]

mod common;

use std::sync::Arc;

use common::RecordingChannel;
use runtime_issues::{CallSite, FallbackNotice, ImageLocator, Logger};

#[test]
fn test_process_gate_shared_by_default()
{
    assert!(Arc::ptr_eq(&FallbackNotice::process(), &FallbackNotice::process()));

    let channels = [RecordingChannel::new(), RecordingChannel::new(), RecordingChannel::new()];
    let loggers: Vec<Logger> = channels
        .iter()
        .enumerate()
        .map(|(index, channel)| {
            Logger::builder(format!("Category {index}"))
                .channel(Arc::clone(channel))
                .images(Arc::new(ImageLocator::resolved(None)))
                .enabled(true)
                .build()
        })
        .collect();

    assert!(!FallbackNotice::process().has_fired());
    for (index, logger) in loggers.iter().enumerate() {
        for line in 1..=3 {
            logger.raise(CallSite::new("src/process.rs", line), format_args!("logger {index}"));
        }
    }

    let notices: usize = channels.iter().map(|channel| channel.notices().len()).sum();
    assert_eq!(notices, 1);
    assert!(FallbackNotice::process().has_fired());
}

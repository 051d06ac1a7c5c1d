//! Tests for raising issues through a `Logger`
//!
//! Raising is compiled out of release builds, so these only run with
//! `debug_assertions` on (see `release.rs` for the other half).

#![cfg(debug_assertions)]

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::{leaked, recording_logger, trusted_image, RecordingChannel};
use runtime_issues::{raise_issue, CallSite, Config, Logger, Severity};

#[test]
fn test_repeated_call_site_emits_once()
{
    let channel = RecordingChannel::new();
    let logger = recording_logger("Test", &channel);
    let file_a = "Sources/App/FileA.swift";
    let file_b = "Sources/App/FileB.swift";

    for _ in 0..3 {
        logger.raise(CallSite::new(file_a, 10), format_args!("x={}", 5));
    }

    let emissions = channel.emissions();
    assert_eq!(emissions.len(), 1);
    assert_eq!(emissions[0].message, "x=5");
    assert_eq!(emissions[0].severity, Severity::Fault);
    assert_eq!(emissions[0].image, trusted_image());

    // Same line, different file: a new call site.
    logger.raise(CallSite::new(file_b, 10), format_args!("x={}", 5));
    assert_eq!(channel.messages(), vec!["x=5", "x=5"]);
}

#[test]
fn test_loggers_have_independent_call_sites()
{
    let channel_a = RecordingChannel::new();
    let channel_b = RecordingChannel::new();
    let logger_a = recording_logger("A", &channel_a);
    let logger_b = recording_logger("B", &channel_b);
    let site = CallSite::new("src/shared.rs", 3);

    logger_a.raise(site, format_args!("from a"));
    logger_a.raise(site, format_args!("from a again"));
    logger_b.raise(site, format_args!("from b"));

    assert_eq!(channel_a.messages(), vec!["from a"]);
    assert_eq!(channel_b.messages(), vec!["from b"]);
    assert!(logger_a.has_raised(&site));
    assert!(logger_b.has_raised(&site));
}

#[test]
fn test_file_compared_by_content()
{
    let channel = RecordingChannel::new();
    let logger = recording_logger("Test", &channel);
    let first = leaked("src/widgets/list.rs");
    let second = leaked("src/widgets/list.rs");
    assert_ne!(first.as_ptr(), second.as_ptr());

    logger.raise(CallSite::new(first, 20), format_args!("first"));
    logger.raise(CallSite::new(second, 20), format_args!("second"));

    assert_eq!(channel.messages(), vec!["first"]);
}

#[test]
fn test_similar_files_are_distinct()
{
    let channel = RecordingChannel::new();
    let logger = recording_logger("Test", &channel);

    logger.raise(CallSite::new("src/a.rs", 1), format_args!("one"));
    logger.raise(CallSite::new("src/a.rs.bak", 1), format_args!("two"));
    logger.raise(CallSite::new("src/a.r", 1), format_args!("three"));
    logger.raise(CallSite::new("src/b.rs", 1), format_args!("four"));

    assert_eq!(channel.messages(), vec!["one", "two", "three", "four"]);
}

#[test]
fn test_disabled_logger_does_not_use_call_site()
{
    let channel = RecordingChannel::new();
    let logger = recording_logger("Test", &channel);
    let site = CallSite::new("src/disabled.rs", 8);

    logger.set_enabled(false);
    assert!(!logger.is_enabled());
    logger.raise(site, format_args!("while disabled"));

    assert!(channel.messages().is_empty());
    assert_eq!(channel.queries(), 0);
    assert!(!logger.has_raised(&site));

    logger.set_enabled(true);
    assert!(logger.is_enabled());
    logger.raise(site, format_args!("after enabling"));

    assert_eq!(channel.messages(), vec!["after enabling"]);
}

#[test]
fn test_inactive_channel_does_not_use_call_site()
{
    let channel = RecordingChannel::new();
    let logger = recording_logger("Test", &channel);
    let site = CallSite::new("src/inactive.rs", 2);

    channel.set_active(false);
    logger.raise(site, format_args!("unobserved"));

    assert_eq!(channel.queries(), 1);
    assert!(channel.messages().is_empty());
    assert!(!logger.has_raised(&site));

    channel.set_active(true);
    logger.raise(site, format_args!("observed"));
    assert_eq!(channel.messages(), vec!["observed"]);
}

#[test]
fn test_macro_captures_call_site()
{
    let channel = RecordingChannel::new();
    let logger = recording_logger("Test", &channel);

    for attempt in 0..3 {
        raise_issue!(logger, "loop attempt {attempt}");
    }
    raise_issue!(logger, "separate line {}", 1);
    raise_issue!(logger, "separate line {}", 2);

    assert_eq!(channel.messages(), vec!["loop attempt 0", "separate line 1", "separate line 2"]);
}

#[test]
fn test_concurrent_raises_emit_once()
{
    let channel = RecordingChannel::new();
    let logger = Arc::new(recording_logger("Test", &channel));
    let barrier = Arc::new(Barrier::new(8));
    let site = CallSite::new("src/hot_loop.rs", 99);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..100 {
                    logger.raise(site, format_args!("worker {worker}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(channel.emissions().len(), 1);
}

#[test]
fn test_shared_logger()
{
    let shared = Logger::shared();
    assert!(std::ptr::eq(shared, Logger::shared()));
    assert_eq!(shared.category(), Config::process().default_category);
}

#[test]
fn test_category()
{
    let channel = RecordingChannel::new();
    assert_eq!(recording_logger("Layout", &channel).category(), "Layout");
}

//! Example raising runtime issues from a loop
//!
//! Run under Xcode (or watch Console.app) on macOS to see the issue
//! highlighted; elsewhere the issue is printed by the `tracing` subscriber.
//!
//! ```text
//! cargo run -p runtime-issues --example raise
//! RUNTIME_ISSUES_TRUSTED_IMAGE=NoSuchImage cargo run -p runtime-issues --example raise
//! ```
//!
//! Each call site reports once, however many times the loop runs.

use runtime_issues::{raise_issue, runtime_issue, LoadedImages, Logger};
use runtime_issues_utils::{info, init_logging};

fn main()
{
    let _guard = init_logging().expect("Failed to initialize logging");

    let images = LoadedImages::snapshot();
    info!(images = images.len(), "Loaded images");

    for frame in 0..5 {
        runtime_issue!("frame {frame}: state modified during view update");
    }

    let layout = Logger::new("Layout");
    for width in [-1.0_f64, -2.0, -3.0] {
        raise_issue!(layout, "negative width {width} clamped to zero");
    }

    layout.set_enabled(false);
    raise_issue!(layout, "never shown while disabled");

    info!("Done");
}

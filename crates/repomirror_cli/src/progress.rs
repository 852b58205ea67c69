//! Progress reporting for sync operations.
//!
//! Engine events are rendered as structured `tracing` output.

mod logging;

use std::sync::Arc;

use repomirror::sync::ProgressCallback;

pub use logging::LoggingReporter;

/// Create a progress callback that forwards events to a [`LoggingReporter`].
pub fn progress_callback() -> ProgressCallback {
    let reporter = Arc::new(LoggingReporter::new());
    Box::new(move |event| reporter.handle(event))
}

//! Progress reporting types for sync runs.
//!
//! The engine emits these events through an optional callback; front ends
//! decide how to render them (the CLI logs them).

use chrono::{DateTime, Utc};

use crate::platform::ResourceKind;

/// Progress events emitted during sync runs.
///
/// `repository` is always the `owner/name` full name.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// A paginated run is starting with its resolved window.
    SyncStarted {
        repository: String,
        kind: ResourceKind,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    },

    /// A page came back from the platform.
    PageFetched {
        repository: String,
        kind: ResourceKind,
        /// Page number (1-indexed).
        page: u32,
        count: usize,
    },

    /// A page's transaction committed.
    PageCommitted {
        repository: String,
        kind: ResourceKind,
        page: u32,
        created: usize,
        updated: usize,
    },

    /// A malformed record was skipped.
    RecordSkipped {
        repository: String,
        kind: ResourceKind,
        page: u32,
        reason: String,
    },

    /// The run stopped on a fetch error; committed pages stay.
    SyncFailed {
        repository: String,
        kind: ResourceKind,
        page: u32,
        error: String,
    },

    /// The run finished and its checkpoint moved.
    SyncComplete {
        repository: String,
        kind: ResourceKind,
        pages: u32,
        created: usize,
        updated: usize,
        checkpoint: DateTime<Utc>,
    },

    /// Repository metadata was refreshed.
    MetadataSynced { repository: String },

    /// A dispatcher job failed and will run again after `delay_secs`.
    RetryScheduled {
        job: String,
        attempt: u32,
        delay_secs: u64,
        error: String,
    },
}

/// Callback for progress updates during sync runs.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

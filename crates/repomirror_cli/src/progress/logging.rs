use repomirror::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::SyncStarted {
                repository,
                kind,
                since,
                until,
            } => {
                tracing::info!(
                    repository = %repository,
                    %kind,
                    since = ?since,
                    until = ?until,
                    "Syncing"
                );
            }

            SyncProgress::PageFetched {
                repository,
                kind,
                page,
                count,
            } => {
                tracing::debug!(repository = %repository, %kind, page, count, "Fetched page");
            }

            SyncProgress::PageCommitted {
                repository,
                kind,
                page,
                created,
                updated,
            } => {
                tracing::info!(repository = %repository, %kind, page, created, updated, "Saved page");
            }

            SyncProgress::RecordSkipped {
                repository,
                kind,
                page,
                reason,
            } => {
                tracing::warn!(repository = %repository, %kind, page, reason = %reason, "Skipped record");
            }

            SyncProgress::SyncFailed {
                repository,
                kind,
                page,
                error,
            } => {
                tracing::error!(repository = %repository, %kind, page, error = %error, "Sync failed");
            }

            SyncProgress::SyncComplete {
                repository,
                kind,
                pages,
                created,
                updated,
                checkpoint,
            } => {
                tracing::info!(
                    repository = %repository,
                    %kind,
                    pages,
                    created,
                    updated,
                    checkpoint = %checkpoint,
                    "Sync complete"
                );
            }

            SyncProgress::MetadataSynced { repository } => {
                tracing::info!(repository = %repository, "Metadata refreshed");
            }

            SyncProgress::RetryScheduled {
                job,
                attempt,
                delay_secs,
                error,
            } => {
                tracing::warn!(
                    job = %job,
                    attempt,
                    delay_secs,
                    error = %error,
                    "Job failed, will retry"
                );
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}

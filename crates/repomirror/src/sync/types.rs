//! Options and results of sync runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::ResourceKind;

/// Caller-level policy for a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Store pull requests that the issues endpoint returns alongside issues.
    /// Off by default: pull-request-shaped records are skipped.
    pub include_pull_requests: bool,
}

/// Outcome of one paginated run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub kind: ResourceKind,
    /// Non-empty pages processed.
    pub pages: u32,
    /// Records received across all pages.
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    /// Records already seen earlier in the same run.
    pub duplicates: usize,
    pub pull_requests_skipped: usize,
    /// Malformed records that were skipped.
    pub invalid: usize,
    /// New checkpoint value written at the end of the run.
    pub checkpoint: Option<DateTime<Utc>>,
}

impl SyncReport {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            pages: 0,
            fetched: 0,
            created: 0,
            updated: 0,
            duplicates: 0,
            pull_requests_skipped: 0,
            invalid: 0,
            checkpoint: None,
        }
    }

    /// Records created or updated.
    pub fn processed(&self) -> usize {
        self.created + self.updated
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} {}: {} created, {} updated over {} page(s)",
            self.processed(),
            self.kind,
            self.created,
            self.updated,
            self.pages
        );
        if self.duplicates > 0 {
            summary.push_str(&format!(", {} duplicate(s) ignored", self.duplicates));
        }
        if self.pull_requests_skipped > 0 {
            summary.push_str(&format!(
                ", {} pull request(s) skipped",
                self.pull_requests_skipped
            ));
        }
        if self.invalid > 0 {
            summary.push_str(&format!(", {} malformed record(s) skipped", self.invalid));
        }
        summary
    }
}

//! Sync engine for mirroring one repository's issues and commits.
//!
//! # Module Structure
//!
//! - [`params`] - Window resolution: `resolve_window()`, `parse_timestamp()`
//! - [`reconcile`] - Raw record to row mapping: `IssueReconciler`, `CommitReconciler`
//! - [`linker`] - Commit message issue references: `issue_refs()`, `link_commit_issues()`
//! - [`driver`] - Page loop with per-page transactions: `drive()`
//! - [`tasks`] - Job entry points: `sync_metadata()`, `sync_issues()`, `sync_commits()`
//!
//! # Example
//!
//! ```ignore
//! use repomirror::sync::{IssueSyncRequest, SyncOptions, sync_issues};
//!
//! let report = sync_issues(
//!     &db,
//!     &client,
//!     repository.id,
//!     &IssueSyncRequest::default(),
//!     &SyncOptions::default(),
//!     None,
//! )
//! .await?;
//! println!("{}", report.summary());
//! ```

pub mod driver;
mod error;
pub mod linker;
pub mod params;
mod progress;
pub mod reconcile;
mod tasks;
mod types;

pub use error::SyncError;
pub use progress::{ProgressCallback, SyncProgress, emit};
pub(crate) use tasks::default_issue_state;
pub use tasks::{CommitSyncRequest, IssueSyncRequest, sync_commits, sync_issues, sync_metadata};
pub use types::{SyncOptions, SyncReport};

pub use driver::drive;
pub use linker::{issue_refs, link_commit_issues};
pub use params::{SyncWindow, parse_timestamp, resolve_window};
pub use reconcile::{CommitReconciler, IssueReconciler, ReconcileError, Reconciler, Upserted};

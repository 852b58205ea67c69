//! Repomirror - mirror a code host's issues and commits into a relational store.
//!
//! The engine pages through a repository's issues and commits, upserts each
//! record by its natural key, resolves users and assignees, links commits to
//! the issues their messages close, and remembers a per-collection checkpoint
//! so the next run only asks for what changed.
//!
//! # Features
//!
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to automatically run migrations on connection.
//! - `sqlite` / `postgres` - Database backends.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use repomirror::{connect_and_migrate, dispatch::{Dispatcher, SyncJob}, github::GitHubClient, store};
//!
//! let db = Arc::new(connect_and_migrate("sqlite://repomirror.db?mode=rwc").await?);
//! let repo = store::repos::get_by_full_name(&db, "octocat/hello-world").await?;
//!
//! let client = GitHubClient::new(repomirror::github::GITHUB_API_URL, token, None)?;
//! let dispatcher = Dispatcher::new(Arc::clone(&db), Arc::new(client));
//! let outcome = dispatcher.run(SyncJob::issues(repo.id)).await;
//! println!("{}", outcome);
//! ```

pub mod db;
pub mod dispatch;
pub mod entity;
pub mod github;
pub mod http;
pub mod platform;
pub mod retry;
pub mod store;
pub mod sync;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use dispatch::{Dispatcher, JobOutcome, JobStatus, SyncJob};
pub use entity::prelude::*;
pub use platform::{ApiError, ApiRateLimiter, PlatformClient, RateLimitInfo, RepoCoordinates};
pub use retry::RetryPolicy;
pub use store::StoreError;
pub use sync::{SyncError, SyncOptions, SyncProgress, SyncReport};

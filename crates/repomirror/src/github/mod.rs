//! GitHub REST client for the sync engine.
//!
//! ```ignore
//! use repomirror::github::GitHubClient;
//!
//! let client = GitHubClient::new(GITHUB_API_URL, Some(token), None)?;
//! let page = client.fetch_page(ResourceKind::Issues, &coords, &filter, 1, 100).await?;
//! ```

mod client;

pub use client::{GITHUB_API_URL, GitHubClient};

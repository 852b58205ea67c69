use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::issue_state::IssueState;
use crate::entity::platform_type::PlatformType;

use super::errors::ApiError;

/// Records requested per page. The last-page check relies on it.
pub const PAGE_SIZE: u32 = 100;

/// Format a timestamp the way the platform expects query filters
/// (`YYYY-MM-DDTHH:MM:SSZ`).
pub fn format_api_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Paginated collections the engine synchronizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Issues,
    Commits,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Issues => "issues",
            ResourceKind::Commits => "commits",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `state` filter for issue listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl IssueStateFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStateFilter::All => "all",
            IssueStateFilter::Open => "open",
            IssueStateFilter::Closed => "closed",
        }
    }
}

impl std::str::FromStr for IssueStateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(IssueStateFilter::All),
            "open" => Ok(IssueStateFilter::Open),
            "closed" => Ok(IssueStateFilter::Closed),
            other => Err(format!("Unknown issue state filter: {}", other)),
        }
    }
}

/// Query filters for one listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub state: Option<IssueStateFilter>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    /// Branch, tag or SHA to start a commit listing from.
    pub sha: Option<String>,
}

/// Owner/name pair addressing a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoCoordinates {
    pub owner: String,
    pub name: String,
}

impl RepoCoordinates {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`. Both halves must be non-empty.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ─── Raw wire records ────────────────────────────────────────────────────────

/// Platform ids arrive as JSON numbers on GitHub and as strings elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalId::Int(id) => write!(f, "{}", id),
            ExternalId::Str(id) => f.write_str(id),
        }
    }
}

/// An account reference embedded in issue and commit payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub id: Option<ExternalId>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawIssue {
    pub id: ExternalId,
    pub number: i32,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: IssueState,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub closed_by: Option<RawUser>,
    #[serde(default)]
    pub assignees: Option<Vec<RawUser>>,
    #[serde(default)]
    pub labels: Option<serde_json::Value>,
    #[serde(default)]
    pub milestone: Option<serde_json::Value>,
    #[serde(default)]
    pub comments: Option<i32>,
    /// Present only on pull requests listed through the issues endpoint.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub commit: RawCommitDetail,
    /// Platform account of the author; null when the email matches none.
    #[serde(default)]
    pub author: Option<RawUser>,
    #[serde(default)]
    pub committer: Option<RawUser>,
    #[serde(default)]
    pub stats: Option<RawStats>,
    #[serde(default)]
    pub parents: Vec<RawParent>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCommitDetail {
    pub message: String,
    pub author: RawSignature,
    pub committer: RawSignature,
    #[serde(default)]
    pub verification: Option<RawVerification>,
}

/// Git-level identity and timestamp of an author or committer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSignature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawVerification {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub additions: i32,
    #[serde(default)]
    pub deletions: i32,
    #[serde(default)]
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawParent {
    pub sha: String,
}

/// Repository metadata as returned by `GET /repos/{owner}/{name}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRepository {
    pub id: ExternalId,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: i32,
    #[serde(default)]
    pub forks_count: i32,
    #[serde(default)]
    pub open_issues_count: i32,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub ssh_url: Option<String>,
}

/// Read-only view of a remote platform used by the sync engine.
///
/// Implementations attach credentials, honour rate limits and map HTTP
/// failures to [`ApiError`]. They perform no retries of their own.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Get the platform type this client connects to.
    fn platform_type(&self) -> PlatformType;

    /// Fetch repository metadata.
    async fn get_repository(&self, repo: &RepoCoordinates) -> Result<RawRepository, ApiError>;

    /// Fetch one page of a collection in ascending order.
    ///
    /// Records are returned undecoded so that one malformed record does not
    /// poison the page. An empty vector means the collection is exhausted.
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        repo: &RepoCoordinates,
        filter: &FilterParams,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, ApiError>;
}

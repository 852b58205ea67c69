//! Platform-agnostic view of the remote forge API.
//!
//! The sync engine only sees the [`PlatformClient`] trait; the GitHub REST
//! implementation lives in [`crate::github`].

mod errors;
mod rate_limit;
mod types;

pub use errors::ApiError;
pub use rate_limit::{
    ApiRateLimiter, GITHUB_DEFAULT_RPS, LOW_WATER_MARK, RESET_SAFETY_MARGIN, RateLimitInfo,
    parse_rate_limit_headers,
};
pub use types::{
    ExternalId, FilterParams, IssueStateFilter, PAGE_SIZE, PlatformClient, RawCommit,
    RawCommitDetail, RawIssue, RawParent, RawRepository, RawSignature, RawStats, RawUser,
    RawVerification, RepoCoordinates, ResourceKind, format_api_timestamp,
};

//! Entry points for the three sync jobs.
//!
//! Each task loads the repository fresh, resolves its window from the
//! request and the stored checkpoint, then hands over to the driver.

use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::repository::Model as RepositoryModel;
use crate::platform::{FilterParams, IssueStateFilter, PlatformClient, RepoCoordinates};
use crate::store;

use super::driver::drive;
use super::error::SyncError;
use super::params::resolve_window;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::reconcile::{CommitReconciler, IssueReconciler};
use super::types::{SyncOptions, SyncReport};

/// Issue state filter used when a request names none.
pub(crate) fn default_issue_state() -> String {
    IssueStateFilter::All.as_str().to_string()
}

/// Arguments of an issue sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSyncRequest {
    /// `all`, `open` or `closed`.
    #[serde(default = "default_issue_state")]
    pub state: String,
    /// Lower bound overriding the checkpoint.
    #[serde(default)]
    pub since: Option<String>,
    /// Ignore every lower bound and walk the whole collection.
    #[serde(default)]
    pub full_sync: bool,
}

impl Default for IssueSyncRequest {
    fn default() -> Self {
        Self {
            state: default_issue_state(),
            since: None,
            full_sync: false,
        }
    }
}

/// Arguments of a commit sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSyncRequest {
    #[serde(default)]
    pub since: Option<String>,
    #[serde(default)]
    pub until: Option<String>,
    /// Branch, tag or SHA to walk instead of the default branch.
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub full_sync: bool,
}

async fn load_repository(
    db: &DatabaseConnection,
    repository_id: Uuid,
) -> Result<RepositoryModel, SyncError> {
    store::repos::find_by_id(db, repository_id)
        .await?
        .ok_or(SyncError::RepositoryNotFound(repository_id))
}

/// Refresh descriptive repository fields from the platform.
pub async fn sync_metadata(
    db: &DatabaseConnection,
    client: &dyn PlatformClient,
    repository_id: Uuid,
    on_progress: Option<&ProgressCallback>,
) -> Result<RepositoryModel, SyncError> {
    let repository = load_repository(db, repository_id).await?;
    let coords = RepoCoordinates::new(&repository.owner, &repository.name);

    let raw = client
        .get_repository(&coords)
        .await
        .map_err(SyncError::Metadata)?;

    let full_name = repository.full_name.clone();
    let updated = store::repos::apply_metadata(db, repository, &raw, Utc::now())
        .await
        .map_err(|err| match err {
            store::StoreError::Database(DbErr::RecordNotUpdated) => {
                SyncError::RepositoryNotFound(repository_id)
            }
            other => other.into(),
        })?;

    tracing::info!(repository = %full_name, "Synced repository metadata");
    emit(
        on_progress,
        SyncProgress::MetadataSynced {
            repository: full_name,
        },
    );

    Ok(updated)
}

/// Mirror issues (and their users and assignees) for one repository.
///
/// # Errors
/// `InvalidRequest` for an unknown state filter, checked before anything
/// else happens.
pub async fn sync_issues(
    db: &DatabaseConnection,
    client: &dyn PlatformClient,
    repository_id: Uuid,
    request: &IssueSyncRequest,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncReport, SyncError> {
    let state: IssueStateFilter = request.state.parse().map_err(SyncError::InvalidRequest)?;
    let repository = load_repository(db, repository_id).await?;

    let window = resolve_window(
        request.since.as_deref(),
        None,
        request.full_sync,
        repository.issues_checkpoint(),
    );
    let filter = FilterParams {
        state: Some(state),
        since: window.since,
        until: None,
        sha: None,
    };

    drive(
        db,
        client,
        &repository,
        &IssueReconciler,
        &filter,
        options,
        on_progress,
    )
    .await
}

/// Mirror commits (and the issues they close) for one repository.
pub async fn sync_commits(
    db: &DatabaseConnection,
    client: &dyn PlatformClient,
    repository_id: Uuid,
    request: &CommitSyncRequest,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncReport, SyncError> {
    let repository = load_repository(db, repository_id).await?;

    let window = resolve_window(
        request.since.as_deref(),
        request.until.as_deref(),
        request.full_sync,
        repository.commits_checkpoint(),
    );
    let filter = FilterParams {
        state: None,
        since: window.since,
        until: window.until,
        sha: request.sha.clone().filter(|sha| !sha.trim().is_empty()),
    };

    drive(
        db,
        client,
        &repository,
        &CommitReconciler,
        &filter,
        options,
        on_progress,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_request_defaults_to_all_states() {
        let request: IssueSyncRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, IssueSyncRequest::default());
        assert_eq!(request.state, "all");
    }

    #[test]
    fn commit_request_round_trips_bounds() {
        let request: CommitSyncRequest = serde_json::from_str(
            r#"{"since": "2024-01-01T00:00:00Z", "until": "2024-02-01", "full_sync": true}"#,
        )
        .unwrap();
        assert_eq!(request.since.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(request.until.as_deref(), Some("2024-02-01"));
        assert!(request.full_sync);
        assert_eq!(request.sha, None);
    }

    #[test]
    fn commit_request_accepts_a_starting_ref() {
        let request: CommitSyncRequest =
            serde_json::from_str(r#"{"sha": "release-1.x"}"#).unwrap();
        assert_eq!(request.sha.as_deref(), Some("release-1.x"));
        assert!(!request.full_sync);
    }
}

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::platform::{ApiError, ResourceKind};
use crate::store::StoreError;

/// Errors that end a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The repository row vanished between enqueue and execution.
    #[error("Repository {0} not found")]
    RepositoryNotFound(Uuid),

    /// A page fetch failed. Earlier pages stay committed.
    #[error("failed to fetch {kind} page {page}: {source}")]
    Fetch {
        kind: ResourceKind,
        page: u32,
        source: ApiError,
    },

    /// Fetching repository metadata failed.
    #[error("failed to fetch repository metadata: {0}")]
    Metadata(#[source] ApiError),

    /// The request arguments can never succeed.
    #[error("invalid sync request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Whether the run targeted a row that no longer exists.
    pub fn is_not_found(&self) -> bool {
        match self {
            SyncError::RepositoryNotFound(_) => true,
            SyncError::Store(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Whether running the same request again could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::RepositoryNotFound(_) | SyncError::InvalidRequest(_) => false,
            SyncError::Store(err) => !matches!(
                err,
                StoreError::NotFound { .. } | StoreError::InvalidInput { .. }
            ),
            SyncError::Fetch { .. }
            | SyncError::Metadata(_)
            | SyncError::Database(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_are_retryable() {
        let err = SyncError::Fetch {
            kind: ResourceKind::Issues,
            page: 3,
            source: ApiError::Transport("timed out".into()),
        };
        assert!(err.is_retryable());
        assert!(err.to_string().contains("issues page 3"));
    }

    #[test]
    fn missing_repository_is_terminal() {
        assert!(!SyncError::RepositoryNotFound(Uuid::new_v4()).is_retryable());
        assert!(!SyncError::InvalidRequest("state".into()).is_retryable());
        assert!(
            !SyncError::Store(StoreError::NotFound {
                context: "repository".into()
            })
            .is_retryable()
        );
    }

    #[test]
    fn store_lookups_that_miss_count_as_not_found() {
        let err = SyncError::Store(StoreError::repository_not_found(Uuid::nil()));
        assert!(err.is_not_found());
        assert!(SyncError::RepositoryNotFound(Uuid::nil()).is_not_found());
        assert!(!SyncError::InvalidRequest("state".into()).is_not_found());
    }

    #[test]
    fn database_errors_are_retryable() {
        let err = SyncError::Database(DbErr::Custom("database is locked".into()));
        assert!(err.is_retryable());
    }
}

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Row not found.
    #[error("Not found: {context}")]
    NotFound { context: String },

    /// A repository with the same full name is already tracked.
    #[error("Repository already tracked: {full_name}")]
    Duplicate { full_name: String },

    /// Invalid input data.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl StoreError {
    /// Create a NotFound error for a repository UUID lookup.
    pub fn repository_not_found(id: Uuid) -> Self {
        Self::NotFound {
            context: format!("repository id={}", id),
        }
    }

    /// Create a NotFound error for a full name lookup.
    pub fn repository_not_found_by_name(full_name: &str) -> Self {
        Self::NotFound {
            context: format!("repository {}", full_name),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

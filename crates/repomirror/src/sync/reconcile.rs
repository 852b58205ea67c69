//! Mapping of raw platform records onto local rows.
//!
//! Every upsert is keyed by a natural key so replaying a page is harmless:
//! users by external id, issues by `(repository, external_id)`, commits by
//! `(repository, sha)`.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set,
};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::commit::{self, Entity as Commit};
use crate::entity::git_user::{self, Entity as GitUser};
use crate::entity::issue::{self, Entity as Issue};
use crate::entity::issue_assignee::{self, Entity as IssueAssignee};
use crate::platform::{ExternalId, RawCommit, RawIssue, RawUser, RawVerification, ResourceKind};

use super::linker::link_commit_issues;
use super::params::parse_timestamp;

/// Verification status stored when the platform reports none.
pub const UNVERIFIED: &str = "unverified";
pub const VERIFIED: &str = "verified";

/// Per-record failures.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The record is missing a required field or carries a bad value.
    /// Only this record is affected.
    #[error("malformed {kind} record: {message}")]
    Parse { kind: ResourceKind, message: String },

    /// The store rejected a write. The page's transaction is unusable.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ReconcileError {
    fn parse(kind: ResourceKind, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            kind,
            message: message.to_string(),
        }
    }
}

/// Whether an upsert inserted a new row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// Maps one raw record of a collection onto the local schema.
#[async_trait]
pub trait Reconciler: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Key used to drop repeats within one run. `None` marks a record too
    /// malformed to identify.
    fn natural_key(&self, record: &Value) -> Option<String>;

    async fn reconcile(
        &self,
        txn: &DatabaseTransaction,
        repository_id: Uuid,
        record: Value,
    ) -> Result<Upserted, ReconcileError>;
}

/// Pull requests listed by the issues endpoint carry a `pull_request` key.
pub fn is_pull_request(record: &Value) -> bool {
    record.get("pull_request").is_some()
}

fn platform_timestamp(
    kind: ResourceKind,
    field: &str,
    value: &str,
) -> Result<DateTime<FixedOffset>, ReconcileError> {
    parse_timestamp(value)
        .map(|at| at.fixed_offset())
        .map_err(|err| ReconcileError::parse(kind, format!("{}: {:?}: {}", field, value, err)))
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Resolve an embedded user payload to a local user id.
///
/// Creates the user on first sight and refreshes username/avatar when they
/// drift. Absent payloads and payloads without an id resolve to `None`.
pub async fn upsert_user<C: ConnectionTrait>(
    db: &C,
    raw: Option<&RawUser>,
) -> Result<Option<Uuid>, DbErr> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let Some(external_id) = raw.id.as_ref().map(ExternalId::to_string) else {
        return Ok(None);
    };
    let username = raw.login.clone().unwrap_or_default();

    let existing = GitUser::find()
        .filter(git_user::Column::ExternalId.eq(external_id.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(user) => {
            let id = user.id;
            if user.username != username || user.avatar_url != raw.avatar_url {
                let mut model: git_user::ActiveModel = user.into();
                model.username = Set(username);
                model.avatar_url = Set(raw.avatar_url.clone());
                model.update(db).await?;
            }
            Ok(Some(id))
        }
        None => {
            let id = Uuid::new_v4();
            git_user::ActiveModel {
                id: Set(id),
                external_id: Set(external_id),
                username: Set(username),
                avatar_url: Set(raw.avatar_url.clone()),
                web_url: Set(raw.html_url.clone()),
                user_type: Set(raw.user_type.clone()),
            }
            .insert(db)
            .await?;
            Ok(Some(id))
        }
    }
}

// ─── Issues ──────────────────────────────────────────────────────────────────

/// Upserts issues and replaces their assignee sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueReconciler;

#[async_trait]
impl Reconciler for IssueReconciler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Issues
    }

    fn natural_key(&self, record: &Value) -> Option<String> {
        serde_json::from_value::<ExternalId>(record.get("id")?.clone())
            .ok()
            .map(|id| id.to_string())
    }

    async fn reconcile(
        &self,
        txn: &DatabaseTransaction,
        repository_id: Uuid,
        record: Value,
    ) -> Result<Upserted, ReconcileError> {
        let kind = self.kind();
        let raw: RawIssue =
            serde_json::from_value(record).map_err(|e| ReconcileError::parse(kind, e))?;

        // Parse everything before writing so a bad record leaves no trace.
        let created_at = platform_timestamp(kind, "created_at", &raw.created_at)?;
        let updated_at = platform_timestamp(kind, "updated_at", &raw.updated_at)?;
        let closed_at = raw
            .closed_at
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| platform_timestamp(kind, "closed_at", v))
            .transpose()?;
        let external_id = raw.id.to_string();

        let author_id = upsert_user(txn, raw.user.as_ref()).await?;
        let closed_by_id = upsert_user(txn, raw.closed_by.as_ref()).await?;

        let existing = Issue::find()
            .filter(issue::Column::RepositoryId.eq(repository_id))
            .filter(issue::Column::ExternalId.eq(external_id.as_str()))
            .one(txn)
            .await?;

        let (issue_id, outcome) = match &existing {
            Some(row) => (row.id, Upserted::Updated),
            None => (Uuid::new_v4(), Upserted::Created),
        };

        let model = issue::ActiveModel {
            id: Set(issue_id),
            repository_id: Set(repository_id),
            external_id: Set(external_id),
            number: Set(raw.number),
            title: Set(raw.title),
            body: Set(raw.body),
            state: Set(raw.state),
            created_at_git: Set(created_at),
            updated_at_git: Set(updated_at),
            closed_at_git: Set(closed_at),
            author_id: Set(author_id),
            closed_by_id: Set(closed_by_id),
            labels: Set(raw.labels),
            milestone: Set(raw.milestone),
            comments_count: Set(raw.comments.unwrap_or(0)),
            is_pull_request: Set(raw.pull_request.is_some()),
            web_url: Set(raw.html_url),
            synced_at: Set(chrono::Utc::now().fixed_offset()),
        };
        match outcome {
            Upserted::Created => model.insert(txn).await?,
            Upserted::Updated => model.update(txn).await?,
        };

        replace_assignees(txn, issue_id, raw.assignees.as_deref().unwrap_or_default()).await?;

        Ok(outcome)
    }
}

/// Make the issue's assignee set exactly the users in `assignees`.
async fn replace_assignees<C: ConnectionTrait>(
    db: &C,
    issue_id: Uuid,
    assignees: &[RawUser],
) -> Result<(), DbErr> {
    IssueAssignee::delete_many()
        .filter(issue_assignee::Column::IssueId.eq(issue_id))
        .exec(db)
        .await?;

    let mut user_ids: Vec<Uuid> = Vec::with_capacity(assignees.len());
    for raw in assignees {
        if let Some(id) = upsert_user(db, Some(raw)).await?
            && !user_ids.contains(&id)
        {
            user_ids.push(id);
        }
    }

    if user_ids.is_empty() {
        return Ok(());
    }

    IssueAssignee::insert_many(user_ids.into_iter().map(|git_user_id| {
        issue_assignee::ActiveModel {
            issue_id: Set(issue_id),
            git_user_id: Set(git_user_id),
        }
    }))
    .exec_without_returning(db)
    .await?;

    Ok(())
}

// ─── Commits ─────────────────────────────────────────────────────────────────

/// Upserts commits and recomputes their issue links.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitReconciler;

/// `("verified" | "unverified", reason)`; a missing block is unverified.
pub fn verification_fields(verification: Option<&RawVerification>) -> (String, String) {
    match verification {
        Some(v) => (
            if v.verified { VERIFIED } else { UNVERIFIED }.to_string(),
            v.reason.clone().unwrap_or_default(),
        ),
        None => (UNVERIFIED.to_string(), String::new()),
    }
}

#[async_trait]
impl Reconciler for CommitReconciler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Commits
    }

    fn natural_key(&self, record: &Value) -> Option<String> {
        record
            .get("sha")?
            .as_str()
            .filter(|sha| !sha.is_empty())
            .map(str::to_string)
    }

    async fn reconcile(
        &self,
        txn: &DatabaseTransaction,
        repository_id: Uuid,
        record: Value,
    ) -> Result<Upserted, ReconcileError> {
        let kind = self.kind();
        let raw: RawCommit =
            serde_json::from_value(record).map_err(|e| ReconcileError::parse(kind, e))?;
        if raw.sha.is_empty() {
            return Err(ReconcileError::parse(kind, "empty sha"));
        }

        let author_date = platform_timestamp(kind, "commit.author.date", &raw.commit.author.date)?;
        let committer_date =
            platform_timestamp(kind, "commit.committer.date", &raw.commit.committer.date)?;
        let stats = raw.stats.unwrap_or_default();
        let parent_shas: Vec<String> = raw.parents.iter().map(|p| p.sha.clone()).collect();
        let (verification_status, verification_reason) =
            verification_fields(raw.commit.verification.as_ref());

        let author_id = upsert_user(txn, raw.author.as_ref()).await?;
        let committer_id = upsert_user(txn, raw.committer.as_ref()).await?;

        let existing = Commit::find()
            .filter(commit::Column::RepositoryId.eq(repository_id))
            .filter(commit::Column::Sha.eq(raw.sha.as_str()))
            .one(txn)
            .await?;

        let (commit_id, outcome) = match &existing {
            Some(row) => (row.id, Upserted::Updated),
            None => (Uuid::new_v4(), Upserted::Created),
        };

        let message = raw.commit.message;
        let model = commit::ActiveModel {
            id: Set(commit_id),
            repository_id: Set(repository_id),
            short_sha: Set(raw.sha.chars().take(7).collect()),
            sha: Set(raw.sha),
            message: Set(message.clone()),
            author_id: Set(author_id),
            committer_id: Set(committer_id),
            author_date_git: Set(author_date),
            committer_date_git: Set(committer_date),
            additions: Set(stats.additions),
            deletions: Set(stats.deletions),
            total_changes: Set(stats.total),
            parent_shas: Set(serde_json::json!(parent_shas)),
            verification_status: Set(verification_status),
            verification_reason: Set(verification_reason),
            web_url: Set(raw.html_url),
            synced_at: Set(chrono::Utc::now().fixed_offset()),
        };
        match outcome {
            Upserted::Created => model.insert(txn).await?,
            Upserted::Updated => model.update(txn).await?,
        };

        link_commit_issues(txn, repository_id, commit_id, &message).await?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pull_request_marker_is_key_presence() {
        assert!(is_pull_request(&json!({"id": 1, "pull_request": {"url": "x"}})));
        assert!(!is_pull_request(&json!({"id": 1})));
    }

    #[test]
    fn issue_natural_key_accepts_numeric_and_string_ids() {
        let r = IssueReconciler;
        assert_eq!(r.natural_key(&json!({"id": 42})), Some("42".to_string()));
        assert_eq!(r.natural_key(&json!({"id": "I_kw"})), Some("I_kw".to_string()));
        assert_eq!(r.natural_key(&json!({"number": 1})), None);
        assert_eq!(r.natural_key(&json!({"id": [1]})), None);
    }

    #[test]
    fn commit_natural_key_is_the_sha() {
        let r = CommitReconciler;
        assert_eq!(r.natural_key(&json!({"sha": "abc123"})), Some("abc123".to_string()));
        assert_eq!(r.natural_key(&json!({"sha": ""})), None);
        assert_eq!(r.natural_key(&json!({"sha": 5})), None);
    }

    #[test]
    fn verification_defaults_to_unverified() {
        assert_eq!(
            verification_fields(None),
            (UNVERIFIED.to_string(), String::new())
        );
        let verified = RawVerification {
            verified: true,
            reason: Some("valid".to_string()),
        };
        assert_eq!(
            verification_fields(Some(&verified)),
            (VERIFIED.to_string(), "valid".to_string())
        );
        let unsigned = RawVerification {
            verified: false,
            reason: None,
        };
        assert_eq!(
            verification_fields(Some(&unsigned)),
            (UNVERIFIED.to_string(), String::new())
        );
    }
}

//! Commit entity - a commit mirrored from a repository.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Commit model. Identity is `(repository_id, sha)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub repository_id: Uuid,
    /// Full commit SHA.
    pub sha: String,
    /// First 7 characters of `sha`.
    pub short_sha: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,

    // ─── Author and committer (distinct identities and dates) ────────────────
    pub author_id: Option<Uuid>,
    pub committer_id: Option<Uuid>,
    pub author_date_git: DateTimeWithTimeZone,
    pub committer_date_git: DateTimeWithTimeZone,

    // ─── Line statistics ─────────────────────────────────────────────────────
    pub additions: i32,
    pub deletions: i32,
    pub total_changes: i32,

    /// Ordered parent SHAs as a JSON array.
    #[sea_orm(column_type = "Json")]
    pub parent_shas: Json,

    pub verification_status: String,
    pub verification_reason: String,
    pub web_url: Option<String>,
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepositoryId",
        to = "super::repository::Column::Id",
        on_delete = "Cascade"
    )]
    Repository,
    #[sea_orm(
        belongs_to = "super::git_user::Entity",
        from = "Column::AuthorId",
        to = "super::git_user::Column::Id",
        on_delete = "SetNull"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::git_user::Entity",
        from = "Column::CommitterId",
        to = "super::git_user::Column::Id",
        on_delete = "SetNull"
    )]
    Committer,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parent SHAs in stored order.
    pub fn parents(&self) -> Vec<String> {
        self.parent_shas
            .as_array()
            .map(|parents| {
                parents
                    .iter()
                    .filter_map(|p| p.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Merge commits have more than one parent.
    pub fn is_merge_commit(&self) -> bool {
        self.parents().len() > 1
    }
}

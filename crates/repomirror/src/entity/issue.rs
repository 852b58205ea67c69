//! Issue entity - an issue (or pull request) mirrored from a repository.

use chrono::Duration;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::issue_state::IssueState;

/// Issue model. Identity is `(repository_id, external_id)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub repository_id: Uuid,
    /// Immutable platform id of the issue.
    pub external_id: String,
    /// Issue number inside the repository (`#123`).
    pub number: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    pub state: IssueState,

    // ─── Platform timestamps ─────────────────────────────────────────────────
    pub created_at_git: DateTimeWithTimeZone,
    pub updated_at_git: DateTimeWithTimeZone,
    pub closed_at_git: Option<DateTimeWithTimeZone>,

    // ─── People ──────────────────────────────────────────────────────────────
    pub author_id: Option<Uuid>,
    pub closed_by_id: Option<Uuid>,

    // ─── Opaque platform data ────────────────────────────────────────────────
    #[sea_orm(column_type = "Json", nullable)]
    pub labels: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub milestone: Option<Json>,

    pub comments_count: i32,
    pub is_pull_request: bool,
    pub web_url: Option<String>,
    /// When this row was last written by a sync run.
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
        from = "Column::ClosedById",
        to = "super::git_user::Column::Id",
        on_delete = "SetNull"
    )]
    ClosedBy,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }

    /// Time between creation and closing, for closed issues.
    pub fn time_to_close(&self) -> Option<Duration> {
        match (self.state, self.closed_at_git) {
            (IssueState::Closed, Some(closed_at)) => Some(closed_at - self.created_at_git),
            _ => None,
        }
    }
}

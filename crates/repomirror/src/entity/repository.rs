//! Repository entity - a remote repository tracked by the mirror.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::platform_type::PlatformType;

/// Repository model - one row per tracked remote repository.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repositories")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    // ─── Identity ────────────────────────────────────────────────────────────
    /// Platform hosting the repository.
    pub platform: PlatformType,
    /// Owner login (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// `owner/name`, unique across the mirror.
    #[sea_orm(unique)]
    pub full_name: String,
    /// Platform-side repository id, learned on the first metadata sync.
    pub external_id: Option<String>,

    // ─── Metadata ────────────────────────────────────────────────────────────
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars_count: i32,
    pub forks_count: i32,
    pub open_issues_count: i32,
    #[sea_orm(default_value = "main")]
    pub default_branch: String,
    pub is_private: bool,
    pub is_archived: bool,
    pub web_url: Option<String>,
    pub clone_url_http: Option<String>,
    pub clone_url_ssh: Option<String>,

    // ─── Mirror control ──────────────────────────────────────────────────────
    /// Whether bulk sync runs should pick this repository up.
    pub active: bool,
    /// Lower bound for the next incremental issue sync.
    pub last_sync_issues_at: Option<DateTimeWithTimeZone>,
    /// Lower bound for the next incremental commit sync.
    pub last_sync_commits_at: Option<DateTimeWithTimeZone>,
    pub last_sync_metadata_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::issue::Entity")]
    Issues,
    #[sea_orm(has_many = "super::commit::Entity")]
    Commits,
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issues.def()
    }
}

impl Related<super::commit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Derive the unique full name from owner and name.
    pub fn full_name_of(owner: &str, name: &str) -> String {
        format!("{}/{}", owner, name)
    }

    /// Issue checkpoint as UTC.
    pub fn issues_checkpoint(&self) -> Option<DateTime<Utc>> {
        self.last_sync_issues_at.map(|at| at.with_timezone(&Utc))
    }

    /// Commit checkpoint as UTC.
    pub fn commits_checkpoint(&self) -> Option<DateTime<Utc>> {
        self.last_sync_commits_at.map(|at| at.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_test_model() -> Model {
        let now = Utc::now().fixed_offset();
        Model {
            id: Uuid::new_v4(),
            platform: PlatformType::GitHub,
            owner: "octocat".to_string(),
            name: "hello-world".to_string(),
            full_name: "octocat/hello-world".to_string(),
            external_id: None,
            description: None,
            language: None,
            stars_count: 0,
            forks_count: 0,
            open_issues_count: 0,
            default_branch: "main".to_string(),
            is_private: false,
            is_archived: false,
            web_url: None,
            clone_url_http: None,
            clone_url_ssh: None,
            active: true,
            last_sync_issues_at: None,
            last_sync_commits_at: None,
            last_sync_metadata_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_full_name_of() {
        assert_eq!(
            Model::full_name_of("octocat", "hello-world"),
            "octocat/hello-world"
        );
    }

    #[test]
    fn checkpoints_are_converted_to_utc() {
        let mut model = make_test_model();
        assert!(model.issues_checkpoint().is_none());

        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        model.last_sync_issues_at = Some(at.fixed_offset());
        model.last_sync_commits_at = Some(at.fixed_offset());
        assert_eq!(model.issues_checkpoint(), Some(at));
        assert_eq!(model.commits_checkpoint(), Some(at));
    }
}

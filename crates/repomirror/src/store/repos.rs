use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::platform_type::PlatformType;
use crate::entity::repository::{ActiveModel, Column, Entity as Repository, Model};
use crate::entity::{commit, issue};
use crate::platform::RawRepository;

use super::errors::{Result, StoreError};

/// Which `last_sync_*_at` column a successful run stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Metadata,
    Issues,
    Commits,
}

impl Checkpoint {
    fn column(self) -> Column {
        match self {
            Checkpoint::Metadata => Column::LastSyncMetadataAt,
            Checkpoint::Issues => Column::LastSyncIssuesAt,
            Checkpoint::Commits => Column::LastSyncCommitsAt,
        }
    }
}

/// Start tracking `owner/name`.
///
/// # Errors
/// Returns `StoreError::Duplicate` if the full name is already tracked and
/// `StoreError::InvalidInput` for an empty or slash-containing owner/name.
pub async fn create(
    db: &DatabaseConnection,
    platform: PlatformType,
    owner: &str,
    name: &str,
) -> Result<Model> {
    let owner = owner.trim();
    let name = name.trim();
    for (field, value) in [("owner", owner), ("name", name)] {
        if value.is_empty() || value.contains('/') {
            return Err(StoreError::InvalidInput {
                message: format!("invalid repository {}: {:?}", field, value),
            });
        }
    }

    let full_name = Model::full_name_of(owner, name);
    if find_by_full_name(db, &full_name).await?.is_some() {
        return Err(StoreError::Duplicate { full_name });
    }

    let now = Utc::now().fixed_offset();
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        platform: Set(platform),
        owner: Set(owner.to_string()),
        name: Set(name.to_string()),
        full_name: Set(full_name),
        external_id: Set(None),
        description: Set(None),
        language: Set(None),
        stars_count: Set(0),
        forks_count: Set(0),
        open_issues_count: Set(0),
        default_branch: Set("main".to_string()),
        is_private: Set(false),
        is_archived: Set(false),
        web_url: Set(None),
        clone_url_http: Set(None),
        clone_url_ssh: Set(None),
        active: Set(true),
        last_sync_issues_at: Set(None),
        last_sync_commits_at: Set(None),
        last_sync_metadata_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(model.insert(db).await?)
}

/// Find a repository by its UUID.
pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>> {
    Ok(Repository::find_by_id(id).one(db).await?)
}

/// Find a repository by `owner/name`.
pub async fn find_by_full_name(db: &DatabaseConnection, full_name: &str) -> Result<Option<Model>> {
    Ok(Repository::find()
        .filter(Column::FullName.eq(full_name))
        .one(db)
        .await?)
}

/// Like [`find_by_full_name`] but a missing row is an error.
pub async fn get_by_full_name(db: &DatabaseConnection, full_name: &str) -> Result<Model> {
    find_by_full_name(db, full_name)
        .await?
        .ok_or_else(|| StoreError::repository_not_found_by_name(full_name))
}

/// All tracked repositories ordered by full name.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>> {
    Ok(Repository::find()
        .order_by_asc(Column::FullName)
        .all(db)
        .await?)
}

/// Repositories picked up by bulk sync runs.
pub async fn list_active(db: &DatabaseConnection) -> Result<Vec<Model>> {
    Ok(Repository::find()
        .filter(Column::Active.eq(true))
        .order_by_asc(Column::FullName)
        .all(db)
        .await?)
}

/// Enable or disable a repository for bulk sync.
pub async fn set_active(db: &DatabaseConnection, id: Uuid, active: bool) -> Result<Model> {
    let repo = find_by_id(db, id)
        .await?
        .ok_or_else(|| StoreError::repository_not_found(id))?;

    let mut model: ActiveModel = repo.into();
    model.active = Set(active);
    model.updated_at = Set(Utc::now().fixed_offset());
    Ok(model.update(db).await?)
}

/// Overwrite descriptive fields with freshly fetched metadata.
pub async fn apply_metadata(
    db: &DatabaseConnection,
    repo: Model,
    raw: &RawRepository,
    now: DateTime<Utc>,
) -> Result<Model> {
    let mut model: ActiveModel = repo.into();
    model.external_id = Set(Some(raw.id.to_string()));
    model.description = Set(raw.description.clone());
    model.language = Set(raw.language.clone());
    model.stars_count = Set(raw.stargazers_count);
    model.forks_count = Set(raw.forks_count);
    model.open_issues_count = Set(raw.open_issues_count);
    model.default_branch = Set(raw
        .default_branch
        .clone()
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "main".to_string()));
    model.is_private = Set(raw.private);
    model.is_archived = Set(raw.archived);
    model.web_url = Set(raw.html_url.clone());
    model.clone_url_http = Set(raw.clone_url.clone());
    model.clone_url_ssh = Set(raw.ssh_url.clone());
    model.last_sync_metadata_at = Set(Some(now.fixed_offset()));
    model.updated_at = Set(now.fixed_offset());
    Ok(model.update(db).await?)
}

/// Stamp one checkpoint column without touching the rest of the row.
///
/// # Errors
/// Returns `StoreError::NotFound` if the repository no longer exists.
pub async fn advance_checkpoint(
    db: &DatabaseConnection,
    id: Uuid,
    checkpoint: Checkpoint,
    at: DateTime<Utc>,
) -> Result<()> {
    let at = at.fixed_offset();
    let result = Repository::update_many()
        .col_expr(checkpoint.column(), Expr::value(Some(at)))
        .col_expr(Column::UpdatedAt, Expr::value(at))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::repository_not_found(id));
    }
    Ok(())
}

/// Number of mirrored issues for a repository.
pub async fn count_issues(db: &DatabaseConnection, id: Uuid) -> Result<u64> {
    Ok(issue::Entity::find()
        .filter(issue::Column::RepositoryId.eq(id))
        .count(db)
        .await?)
}

/// Number of mirrored commits for a repository.
pub async fn count_commits(db: &DatabaseConnection, id: Uuid) -> Result<u64> {
    Ok(commit::Entity::find()
        .filter(commit::Column::RepositoryId.eq(id))
        .count(db)
        .await?)
}

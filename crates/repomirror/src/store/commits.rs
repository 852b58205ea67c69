use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entity::commit::{Column, Entity as Commit, Model};
use crate::entity::{commit_issue, issue};

use super::errors::Result;

/// Commits of a repository in committer-date order.
pub async fn list_for_repository(db: &DatabaseConnection, repository_id: Uuid) -> Result<Vec<Model>> {
    Ok(Commit::find()
        .filter(Column::RepositoryId.eq(repository_id))
        .order_by_asc(Column::CommitterDateGit)
        .order_by_asc(Column::Sha)
        .all(db)
        .await?)
}

pub async fn find_by_sha(
    db: &DatabaseConnection,
    repository_id: Uuid,
    sha: &str,
) -> Result<Option<Model>> {
    Ok(Commit::find()
        .filter(Column::RepositoryId.eq(repository_id))
        .filter(Column::Sha.eq(sha))
        .one(db)
        .await?)
}

/// Numbers of the issues a commit is linked to, ascending.
pub async fn linked_issue_numbers(db: &DatabaseConnection, commit_id: Uuid) -> Result<Vec<i32>> {
    let issue_ids: Vec<Uuid> = commit_issue::Entity::find()
        .filter(commit_issue::Column::CommitId.eq(commit_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.issue_id)
        .collect();

    if issue_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut numbers: Vec<i32> = issue::Entity::find()
        .filter(issue::Column::Id.is_in(issue_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|issue| issue.number)
        .collect();
    numbers.sort_unstable();
    Ok(numbers)
}

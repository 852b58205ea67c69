use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entity::git_user;
use crate::entity::issue::{Column, Entity as Issue, Model};
use crate::entity::issue_assignee;

use super::errors::Result;

/// Issues of a repository ordered by number.
pub async fn list_for_repository(db: &DatabaseConnection, repository_id: Uuid) -> Result<Vec<Model>> {
    Ok(Issue::find()
        .filter(Column::RepositoryId.eq(repository_id))
        .order_by_asc(Column::Number)
        .all(db)
        .await?)
}

pub async fn find_by_number(
    db: &DatabaseConnection,
    repository_id: Uuid,
    number: i32,
) -> Result<Option<Model>> {
    Ok(Issue::find()
        .filter(Column::RepositoryId.eq(repository_id))
        .filter(Column::Number.eq(number))
        .one(db)
        .await?)
}

/// Current assignees of an issue ordered by username.
pub async fn assignees_of(db: &DatabaseConnection, issue_id: Uuid) -> Result<Vec<git_user::Model>> {
    let user_ids: Vec<Uuid> = issue_assignee::Entity::find()
        .filter(issue_assignee::Column::IssueId.eq(issue_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.git_user_id)
        .collect();

    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(git_user::Entity::find()
        .filter(git_user::Column::Id.is_in(user_ids))
        .order_by_asc(git_user::Column::Username)
        .all(db)
        .await?)
}

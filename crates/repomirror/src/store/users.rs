use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::git_user::{Column, Entity as GitUser, Model};
use crate::entity::{commit, issue, issue_assignee};

use super::errors::Result;

/// Find a user by platform account id.
pub async fn find_by_external_id(
    db: &DatabaseConnection,
    external_id: &str,
) -> Result<Option<Model>> {
    Ok(GitUser::find()
        .filter(Column::ExternalId.eq(external_id))
        .one(db)
        .await?)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    Ok(GitUser::find().count(db).await?)
}

/// Hard-delete a user.
///
/// Issues and commits that referenced the user keep their rows with the
/// reference cleared; assignee rows for the user are removed. Returns the
/// number of users deleted (0 or 1).
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<u64> {
    let txn = db.begin().await?;

    let null_user: Option<Uuid> = None;
    for col in [issue::Column::AuthorId, issue::Column::ClosedById] {
        issue::Entity::update_many()
            .col_expr(col, Expr::value(null_user))
            .filter(col.eq(id))
            .exec(&txn)
            .await?;
    }
    for col in [commit::Column::AuthorId, commit::Column::CommitterId] {
        commit::Entity::update_many()
            .col_expr(col, Expr::value(null_user))
            .filter(col.eq(id))
            .exec(&txn)
            .await?;
    }
    issue_assignee::Entity::delete_many()
        .filter(issue_assignee::Column::GitUserId.eq(id))
        .exec(&txn)
        .await?;

    let result = GitUser::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(result.rows_affected)
}

//! Association between commits and the issues their messages reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commit_issues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub commit_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub issue_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commit::Entity",
        from = "Column::CommitId",
        to = "super::commit::Column::Id",
        on_delete = "Cascade"
    )]
    Commit,
    #[sea_orm(
        belongs_to = "super::issue::Entity",
        from = "Column::IssueId",
        to = "super::issue::Column::Id",
        on_delete = "Cascade"
    )]
    Issue,
}

impl ActiveModelBehavior for ActiveModel {}

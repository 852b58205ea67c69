//! GitUser entity - a platform account referenced by issues and commits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "git_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Platform account id; one local row per value.
    #[sea_orm(unique)]
    pub external_id: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub web_url: Option<String>,
    /// Account type as reported upstream (User, Bot, Organization).
    pub user_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! View entity ("has this user seen this item").
//!
//! A row marks that a user has seen a viewable item (post or news article).
//! Re-viewing refreshes `updated_at`; there is never more than one row per
//! (user, viewable) pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kinds of entities that accumulate per-user view records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ViewableType {
    #[sea_orm(string_value = "post")]
    Post,
    #[sea_orm(string_value = "news")]
    News,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "view")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who viewed
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Kind of the viewed item
    pub viewable_type: ViewableType,

    /// ID of the viewed item
    #[sea_orm(indexed)]
    pub viewable_id: String,

    pub created_at: DateTimeWithTimeZone,

    /// Refreshed on every repeat view
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

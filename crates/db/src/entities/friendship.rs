//! Friendship entity (pairwise relationship requests between users).
//!
//! `user_id1` is the requester and `user_id2` the addressee. A pair of users
//! has at most one row regardless of direction; only the addressee may accept
//! or reject the request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Friendship lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendship")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who sent the request
    pub user_id1: String,

    /// The user who received the request
    pub user_id2: String,

    /// Current lifecycle state
    pub status: FriendshipStatus,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the given user is one of the two parties.
    #[must_use]
    pub fn involves(&self, user_id: &str) -> bool {
        self.user_id1 == user_id || self.user_id2 == user_id
    }

    /// The party that is not the given user, if the user is involved at all.
    #[must_use]
    pub fn other_party(&self, user_id: &str) -> Option<&str> {
        if self.user_id1 == user_id {
            Some(&self.user_id2)
        } else if self.user_id2 == user_id {
            Some(&self.user_id1)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId1",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Requester,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId2",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Addressee,
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(user_id1: &str, user_id2: &str) -> Model {
        Model {
            id: "f1".to_string(),
            user_id1: user_id1.to_string(),
            user_id2: user_id2.to_string(),
            status: FriendshipStatus::Pending,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_involves_either_party() {
        let f = model("a", "b");
        assert!(f.involves("a"));
        assert!(f.involves("b"));
        assert!(!f.involves("c"));
    }

    #[test]
    fn test_other_party() {
        let f = model("a", "b");
        assert_eq!(f.other_party("a"), Some("b"));
        assert_eq!(f.other_party("b"), Some("a"));
        assert_eq!(f.other_party("c"), None);
    }
}

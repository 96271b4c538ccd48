//! Friendship repository.

use std::sync::Arc;

use crate::entities::{friendship, friendship::FriendshipStatus, Friendship};
use alumnet_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, SqlErr,
};

/// Friendship repository for database operations.
#[derive(Clone)]
pub struct FriendshipRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a friendship by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<friendship::Model>> {
        Friendship::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a friendship by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<friendship::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Friendship not found: {id}")))
    }

    /// Find the row for an unordered pair of users, regardless of which side
    /// sent the request.
    pub async fn find_pair(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> AppResult<Option<friendship::Model>> {
        Friendship::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(friendship::Column::UserId1.eq(user_a))
                            .add(friendship::Column::UserId2.eq(user_b)),
                    )
                    .add(
                        Condition::all()
                            .add(friendship::Column::UserId1.eq(user_b))
                            .add(friendship::Column::UserId2.eq(user_a)),
                    ),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new friendship row.
    ///
    /// A unique violation on the pair index (two requests racing) is
    /// surfaced as `Conflict`.
    pub async fn create(&self, model: friendship::ActiveModel) -> AppResult<friendship::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Friendship already exists for this pair".to_string())
                }
                _ => AppError::Database(e.to_string()),
            })
    }

    /// Update a friendship row.
    pub async fn update(&self, model: friendship::ActiveModel) -> AppResult<friendship::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a friendship row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let friendship = self.find_by_id(id).await?;
        if let Some(f) = friendship {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get accepted friendships involving a user (either side).
    pub async fn find_accepted_involving(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<friendship::Model>> {
        Friendship::find()
            .filter(friendship::Column::Status.eq(FriendshipStatus::Accepted))
            .filter(
                Condition::any()
                    .add(friendship::Column::UserId1.eq(user_id))
                    .add(friendship::Column::UserId2.eq(user_id)),
            )
            .order_by_desc(friendship::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get pending requests received by a user.
    pub async fn find_pending_received(&self, user_id: &str) -> AppResult<Vec<friendship::Model>> {
        Friendship::find()
            .filter(friendship::Column::UserId2.eq(user_id))
            .filter(friendship::Column::Status.eq(FriendshipStatus::Pending))
            .order_by_desc(friendship::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

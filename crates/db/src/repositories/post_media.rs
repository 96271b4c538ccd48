//! Post media repository.

use std::sync::Arc;

use crate::entities::{post_media, PostMedia};
use alumnet_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Post media repository for database operations.
#[derive(Clone)]
pub struct PostMediaRepository {
    db: Arc<DatabaseConnection>,
}

impl PostMediaRepository {
    /// Create a new post media repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new media attachment.
    pub async fn create(&self, model: post_media::ActiveModel) -> AppResult<post_media::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get attachments for a post.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Vec<post_media::Model>> {
        PostMedia::find()
            .filter(post_media::Column::PostId.eq(post_id))
            .order_by_asc(post_media::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get attachments for a set of posts in one query.
    pub async fn find_by_posts(&self, post_ids: &[String]) -> AppResult<Vec<post_media::Model>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        PostMedia::find()
            .filter(post_media::Column::PostId.is_in(post_ids.to_vec()))
            .order_by_asc(post_media::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

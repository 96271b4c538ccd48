//! News repository.

use std::sync::Arc;

use crate::entities::{news, News};
use alumnet_common::{AppError, AppResult, PAGE_SIZE};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// News repository for database operations.
#[derive(Clone)]
pub struct NewsRepository {
    db: Arc<DatabaseConnection>,
}

impl NewsRepository {
    /// Create a new news repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an article by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<news::Model>> {
        News::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an article by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<news::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("News not found: {id}")))
    }

    /// Create a new article.
    pub async fn create(&self, model: news::ActiveModel) -> AppResult<news::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an article.
    pub async fn update(&self, model: news::ActiveModel) -> AppResult<news::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an article.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let news = self.find_by_id(id).await?;
        if let Some(n) = news {
            n.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Count published articles.
    pub async fn count_published(&self) -> AppResult<u64> {
        News::find()
            .filter(news::Column::IsPublished.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get one page of published articles, newest publication first.
    pub async fn find_published_page(&self, page_index: u64) -> AppResult<Vec<news::Model>> {
        News::find()
            .filter(news::Column::IsPublished.eq(true))
            .order_by_desc(news::Column::PublishedAt)
            .order_by_desc(news::Column::Id)
            .offset(page_index * PAGE_SIZE)
            .limit(PAGE_SIZE)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

//! View repository.

use std::sync::Arc;

use crate::entities::{view, view::ViewableType, View};
use alumnet_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, SqlErr,
};

/// View repository for database operations.
#[derive(Clone)]
pub struct ViewRepository {
    db: Arc<DatabaseConnection>,
}

impl ViewRepository {
    /// Create a new view repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a view by its natural key.
    pub async fn find_by_user_and_viewable(
        &self,
        user_id: &str,
        viewable_type: ViewableType,
        viewable_id: &str,
    ) -> AppResult<Option<view::Model>> {
        View::find()
            .filter(view::Column::UserId.eq(user_id))
            .filter(view::Column::ViewableType.eq(viewable_type))
            .filter(view::Column::ViewableId.eq(viewable_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new view record.
    ///
    /// A unique violation on the natural key means another request recorded
    /// the view first; surfaced as `Conflict` so the caller can fold it into
    /// the idempotent outcome.
    pub async fn create(&self, model: view::ActiveModel) -> AppResult<view::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("View already recorded".to_string())
                }
                _ => AppError::Database(e.to_string()),
            })
    }

    /// Refresh the timestamp on an existing view record.
    pub async fn touch(
        &self,
        existing: view::Model,
        now: chrono::DateTime<chrono::FixedOffset>,
    ) -> AppResult<view::Model> {
        let mut model: view::ActiveModel = existing.into();
        model.updated_at = Set(now);
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count views of a viewable item.
    pub async fn count_for_viewable(
        &self,
        viewable_type: ViewableType,
        viewable_id: &str,
    ) -> AppResult<u64> {
        View::find()
            .filter(view::Column::ViewableType.eq(viewable_type))
            .filter(view::Column::ViewableId.eq(viewable_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count views for a set of viewable items in one query.
    ///
    /// Returns (viewable_id, count) pairs; items with no views are absent.
    pub async fn count_for_viewables(
        &self,
        viewable_type: ViewableType,
        viewable_ids: &[String],
    ) -> AppResult<Vec<(String, i64)>> {
        if viewable_ids.is_empty() {
            return Ok(vec![]);
        }

        View::find()
            .select_only()
            .column(view::Column::ViewableId)
            .column_as(view::Column::Id.count(), "count")
            .filter(view::Column::ViewableType.eq(viewable_type))
            .filter(view::Column::ViewableId.is_in(viewable_ids.to_vec()))
            .group_by(view::Column::ViewableId)
            .into_tuple::<(String, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

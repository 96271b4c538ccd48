//! Event repository.

use std::sync::Arc;

use crate::entities::{event, Event};
use alumnet_common::{AppError, AppResult, PAGE_SIZE};
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};

/// Time-based listing filters for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventTimeFilter {
    /// All events, by start date.
    #[default]
    All,
    /// Events that have not started yet, soonest first.
    Upcoming,
    /// Events currently running, ending soonest first.
    Ongoing,
    /// Events already over, most recent first.
    Past,
}

impl EventTimeFilter {
    fn apply(self, now: DateTime<FixedOffset>) -> Select<Event> {
        match self {
            Self::All => Event::find().order_by_asc(event::Column::StartDate),
            Self::Upcoming => Event::find()
                .filter(event::Column::StartDate.gt(now))
                .order_by_asc(event::Column::StartDate),
            Self::Ongoing => Event::find()
                .filter(event::Column::StartDate.lte(now))
                .filter(event::Column::EndDate.gte(now))
                .order_by_asc(event::Column::EndDate),
            Self::Past => Event::find()
                .filter(event::Column::EndDate.lt(now))
                .order_by_desc(event::Column::EndDate),
        }
    }
}

/// Event repository for database operations.
#[derive(Clone)]
pub struct EventRepository {
    db: Arc<DatabaseConnection>,
}

impl EventRepository {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<event::Model>> {
        Event::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an event by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<event::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event not found: {id}")))
    }

    /// Create a new event.
    pub async fn create(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an event.
    pub async fn update(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an event.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let event = self.find_by_id(id).await?;
        if let Some(e) = event {
            e.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Count events matching a time filter at the given instant.
    pub async fn count_filtered(
        &self,
        filter: EventTimeFilter,
        now: DateTime<FixedOffset>,
    ) -> AppResult<u64> {
        filter
            .apply(now)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get one page of events matching a time filter at the given instant.
    pub async fn find_page_filtered(
        &self,
        filter: EventTimeFilter,
        now: DateTime<FixedOffset>,
        page_index: u64,
    ) -> AppResult<Vec<event::Model>> {
        filter
            .apply(now)
            .offset(page_index * PAGE_SIZE)
            .limit(PAGE_SIZE)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_event(id: &str, start_in_hours: i64, end_in_hours: i64) -> event::Model {
        let now = Utc::now();
        event::Model {
            id: id.to_string(),
            title: "Career fair".to_string(),
            description: "Meet alumni employers".to_string(),
            location: "Auditorium".to_string(),
            start_date: (now + Duration::hours(start_in_hours)).into(),
            end_date: (now + Duration::hours(end_in_hours)).into(),
            image_url: None,
            organizer_name: "Alumni Office".to_string(),
            contact_info: None,
            external_link: None,
            event_type: "fair".to_string(),
            created_at: now.into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let event = create_test_event("e1", 1, 2);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event.clone()]])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let result = repo.find_by_id("e1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().title, "Career fair");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<event::Model>::new()])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_page_filtered() {
        let e1 = create_test_event("e1", 1, 2);
        let e2 = create_test_event("e2", 3, 4);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let result = repo
            .find_page_filtered(EventTimeFilter::Upcoming, Utc::now().into(), 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count_filtered() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(6))
                }]])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let count = repo
            .count_filtered(EventTimeFilter::All, Utc::now().into())
            .await
            .unwrap();

        assert_eq!(count, 6);
    }
}

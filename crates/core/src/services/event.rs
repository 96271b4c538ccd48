//! Event service.

use crate::services::gate;
use alumnet_common::{AppError, AppResult, IdGenerator, Page, PAGE_SIZE};
use alumnet_db::{
    entities::{event, user},
    repositories::{EventRepository, EventTimeFilter},
};
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating an event.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 255))]
    pub location: String,

    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,

    pub image_url: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub organizer_name: String,

    pub contact_info: Option<String>,

    #[validate(url)]
    pub external_link: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub event_type: String,
}

/// Input for updating an event. Same shape as creation; events are always
/// saved whole.
pub type UpdateEventInput = CreateEventInput;

/// Event service for business logic.
#[derive(Clone)]
pub struct EventService {
    event_repo: EventRepository,
    id_gen: IdGenerator,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub fn new(event_repo: EventRepository) -> Self {
        Self {
            event_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get one page of events matching a time filter.
    pub async fn list_page(
        &self,
        filter: EventTimeFilter,
        page: u64,
    ) -> AppResult<Page<event::Model>> {
        let page = page.max(1);
        let now = Utc::now().into();
        let total_items = self.event_repo.count_filtered(filter, now).await?;
        let items = self
            .event_repo
            .find_page_filtered(filter, now, page - 1)
            .await?;

        Ok(Page::new(
            items,
            page,
            total_items,
            total_items.div_ceil(PAGE_SIZE),
        ))
    }

    /// Get an event by ID.
    pub async fn get(&self, event_id: &str) -> AppResult<event::Model> {
        self.event_repo.get_by_id(event_id).await
    }

    /// Create an event. Admin only.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateEventInput,
    ) -> AppResult<event::Model> {
        gate::ensure_admin(actor)?;
        input.validate()?;
        validate_dates(&input)?;

        let model = event::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            location: Set(input.location),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            image_url: Set(input.image_url),
            organizer_name: Set(input.organizer_name),
            contact_info: Set(input.contact_info),
            external_link: Set(input.external_link),
            event_type: Set(input.event_type),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let created = self.event_repo.create(model).await?;

        tracing::debug!(event_id = %created.id, "Created event");

        Ok(created)
    }

    /// Update an event. Admin only.
    pub async fn update(
        &self,
        actor: &user::Model,
        event_id: &str,
        input: UpdateEventInput,
    ) -> AppResult<event::Model> {
        gate::ensure_admin(actor)?;
        input.validate()?;
        validate_dates(&input)?;

        let existing = self.event_repo.get_by_id(event_id).await?;

        let mut model: event::ActiveModel = existing.into();
        model.title = Set(input.title);
        model.description = Set(input.description);
        model.location = Set(input.location);
        model.start_date = Set(input.start_date);
        model.end_date = Set(input.end_date);
        model.image_url = Set(input.image_url);
        model.organizer_name = Set(input.organizer_name);
        model.contact_info = Set(input.contact_info);
        model.external_link = Set(input.external_link);
        model.event_type = Set(input.event_type);
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.event_repo.update(model).await?;

        tracing::debug!(event_id = %updated.id, "Updated event");

        Ok(updated)
    }

    /// Delete an event. Admin only.
    pub async fn delete(&self, actor: &user::Model, event_id: &str) -> AppResult<()> {
        gate::ensure_admin(actor)?;

        let event = self.event_repo.get_by_id(event_id).await?;
        self.event_repo.delete(&event.id).await?;

        tracing::debug!(event_id = %event.id, actor_id = %actor.id, "Deleted event");

        Ok(())
    }
}

fn validate_dates(input: &CreateEventInput) -> AppResult<()> {
    if input.end_date < input.start_date {
        return Err(AppError::Validation(
            "Event end date must not be before its start date".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            token: None,
            profile_image: None,
            bio: None,
            graduation_year: None,
            course: None,
            current_job: None,
            current_company: None,
            linkedin_url: None,
            is_admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_input(start_in_hours: i64, end_in_hours: i64) -> CreateEventInput {
        let now = Utc::now();
        CreateEventInput {
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
        }
    }

    #[tokio::test]
    async fn test_create_by_non_admin_returns_forbidden() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = EventService::new(EventRepository::new(db));

        let actor = create_test_user("u1", false);
        let result = service.create(&actor, create_test_input(1, 2)).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_end_before_start() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = EventService::new(EventRepository::new(db));

        let actor = create_test_user("admin", true);
        let result = service.create(&actor, create_test_input(2, 1)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_by_admin_inserts_event() {
        let now = Utc::now();
        let created = event::Model {
            id: "e1".to_string(),
            title: "Career fair".to_string(),
            description: "Meet alumni employers".to_string(),
            location: "Auditorium".to_string(),
            start_date: (now + Duration::hours(1)).into(),
            end_date: (now + Duration::hours(2)).into(),
            image_url: None,
            organizer_name: "Alumni Office".to_string(),
            contact_info: None,
            external_link: None,
            event_type: "fair".to_string(),
            created_at: now.into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .into_connection(),
        );
        let service = EventService::new(EventRepository::new(db));

        let actor = create_test_user("admin", true);
        let result = service.create(&actor, create_test_input(1, 2)).await.unwrap();

        assert_eq!(result.id, "e1");
    }

    #[tokio::test]
    async fn test_delete_by_non_admin_returns_forbidden() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = EventService::new(EventRepository::new(db));

        let actor = create_test_user("u1", false);
        let result = service.delete(&actor, "e1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_page_carries_metadata() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(15))
                }]])
                .append_query_results([Vec::<event::Model>::new()])
                .into_connection(),
        );
        let service = EventService::new(EventRepository::new(db));

        let page = service.list_page(EventTimeFilter::All, 2).await.unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.total_items, 15);
        assert_eq!(page.total_pages, 2);
    }
}

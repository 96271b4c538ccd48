//! Events endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use alumnet_common::{AppResult, Page};
use alumnet_core::{CreateEventInput, UpdateEventInput};
use alumnet_db::{
    entities::event::{self, EventStatus},
    repositories::EventTimeFilter,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Query parameters for the event listing.
#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
}

const fn default_page() -> u64 {
    1
}

/// Event response with its clock-derived status.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub image_url: Option<String>,
    pub organizer_name: String,
    pub contact_info: Option<String>,
    pub external_link: Option<String>,
    pub event_type: String,
    /// Derived from start/end against the clock; never stored
    pub status: EventStatus,
    pub created_at: String,
}

impl From<event::Model> for EventResponse {
    fn from(event: event::Model) -> Self {
        let status = event.status_at(Utc::now().into());
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            start_date: event.start_date.to_rfc3339(),
            end_date: event.end_date.to_rfc3339(),
            image_url: event.image_url,
            organizer_name: event.organizer_name,
            contact_info: event.contact_info,
            external_link: event.external_link,
            event_type: event.event_type,
            status,
            created_at: event.created_at.to_rfc3339(),
        }
    }
}

fn parse_filter(filter: Option<&str>) -> EventTimeFilter {
    match filter {
        Some("upcoming") => EventTimeFilter::Upcoming,
        Some("ongoing") => EventTimeFilter::Ongoing,
        Some("past") => EventTimeFilter::Past,
        _ => EventTimeFilter::All,
    }
}

/// List events, optionally filtered to upcoming/ongoing/past.
async fn index(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> AppResult<ApiResponse<Page<EventResponse>>> {
    let filter = parse_filter(query.filter.as_deref());
    let page = state.event_service.list_page(filter, query.page).await?;
    Ok(ApiResponse::ok(page.map(EventResponse::from)))
}

/// Show an event.
async fn show(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.get(&event_id).await?;
    Ok(ApiResponse::ok(event.into()))
}

/// Create an event. Admin only.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEventInput>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.create(&user, input).await?;
    Ok(ApiResponse::ok(event.into()))
}

/// Update an event. Admin only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(input): Json<UpdateEventInput>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.update(&user, &event_id, input).await?;
    Ok(ApiResponse::ok(event.into()))
}

/// Delete an event. Admin only.
async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.event_service.delete(&user, &event_id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
}

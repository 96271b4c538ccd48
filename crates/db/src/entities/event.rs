//! Event entity.
//!
//! Events carry no stored status; whether an event is scheduled, ongoing, or
//! completed is derived from `start_date`/`end_date` against the clock at
//! read time.

use chrono::{DateTime, FixedOffset};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event status, derived from the event timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Ongoing,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub location: String,

    #[sea_orm(indexed)]
    pub start_date: DateTimeWithTimeZone,

    #[sea_orm(indexed)]
    pub end_date: DateTimeWithTimeZone,

    /// Header image path (relative, served from the public media directory)
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    pub organizer_name: String,

    #[sea_orm(nullable)]
    pub contact_info: Option<String>,

    #[sea_orm(nullable)]
    pub external_link: Option<String>,

    /// Free-form category (reunion, lecture, workshop, ...)
    pub event_type: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Derive the event status at the given instant.
    #[must_use]
    pub fn status_at(&self, now: DateTime<FixedOffset>) -> EventStatus {
        if now < self.start_date {
            EventStatus::Scheduled
        } else if now <= self.end_date {
            EventStatus::Ongoing
        } else {
            EventStatus::Completed
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

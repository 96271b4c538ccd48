//! Create event table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Event::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Event::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Event::Description).text().not_null())
                    .col(ColumnDef::new(Event::Location).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Event::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Event::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Event::ImageUrl).string_len(512))
                    .col(
                        ColumnDef::new(Event::OrganizerName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Event::ContactInfo).string_len(256))
                    .col(ColumnDef::new(Event::ExternalLink).string_len(512))
                    .col(ColumnDef::new(Event::EventType).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Event::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Event::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Indexes: start/end drive the upcoming/ongoing/past filters
        manager
            .create_index(
                Index::create()
                    .name("idx_event_start_date")
                    .table(Event::Table)
                    .col(Event::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_end_date")
                    .table(Event::Table)
                    .col(Event::EndDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
    Title,
    Description,
    Location,
    StartDate,
    EndDate,
    ImageUrl,
    OrganizerName,
    ContactInfo,
    ExternalLink,
    EventType,
    CreatedAt,
    UpdatedAt,
}

//! Create view table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(View::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(View::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(View::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(View::ViewableType).string_len(16).not_null())
                    .col(ColumnDef::new(View::ViewableId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(View::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(View::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_view_user")
                            .from(View::Table, View::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, viewable_type, viewable_id) - one row per
        // user per viewed item; repeat views refresh updated_at
        manager
            .create_index(
                Index::create()
                    .name("idx_view_user_viewable")
                    .table(View::Table)
                    .col(View::UserId)
                    .col(View::ViewableType)
                    .col(View::ViewableId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (viewable_type, viewable_id) for view counts
        manager
            .create_index(
                Index::create()
                    .name("idx_view_viewable")
                    .table(View::Table)
                    .col(View::ViewableType)
                    .col(View::ViewableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(View::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum View {
    Table,
    Id,
    UserId,
    ViewableType,
    ViewableId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

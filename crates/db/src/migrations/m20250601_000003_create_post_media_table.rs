//! Create post media table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostMedia::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostMedia::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostMedia::Url).string_len(512).not_null())
                    .col(ColumnDef::new(PostMedia::Type).string_len(16).not_null())
                    .col(
                        ColumnDef::new(PostMedia::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_media_post")
                            .from(PostMedia::Table, PostMedia::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: post_id (for loading a post's attachments)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_media_post_id")
                    .table(PostMedia::Table)
                    .col(PostMedia::PostId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostMedia::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostMedia {
    Table,
    Id,
    PostId,
    Url,
    Type,
    CreatedAt,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}

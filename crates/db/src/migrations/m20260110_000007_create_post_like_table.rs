//! Create post like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostLike::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostLike::PostId).integer().not_null())
                    .col(ColumnDef::new(PostLike::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(PostLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Composite key: one like per user per post
                    .primary_key(Index::create().col(PostLike::PostId).col(PostLike::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_like_post")
                            .from(PostLike::Table, PostLike::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_like_user")
                            .from(PostLike::Table, PostLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (per-viewer liked-post lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_like_user_id")
                    .table(PostLike::Table)
                    .col(PostLike::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostLike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostLike {
    Table,
    PostId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

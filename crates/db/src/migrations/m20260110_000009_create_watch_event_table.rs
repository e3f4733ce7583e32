//! Create watch event table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WatchEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WatchEvent::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WatchEvent::HostId).integer().not_null())
                    .col(ColumnDef::new(WatchEvent::MovieId).integer())
                    .col(ColumnDef::new(WatchEvent::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(WatchEvent::EventDateTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WatchEvent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_watch_event_host")
                            .from(WatchEvent::Table, WatchEvent::HostId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_watch_event_movie")
                            .from(WatchEvent::Table, WatchEvent::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (host_id, event_date_time) for upcoming-event counts
        manager
            .create_index(
                Index::create()
                    .name("idx_watch_event_host_time")
                    .table(WatchEvent::Table)
                    .col(WatchEvent::HostId)
                    .col(WatchEvent::EventDateTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WatchEvent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WatchEvent {
    Table,
    Id,
    HostId,
    MovieId,
    Title,
    EventDateTime,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Movie {
    Table,
    Id,
}

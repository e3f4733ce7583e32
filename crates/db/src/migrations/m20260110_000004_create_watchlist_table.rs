//! Create watchlist table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WatchlistEntry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WatchlistEntry::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(WatchlistEntry::MovieId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WatchlistEntry::Status)
                            .string_len(16)
                            .not_null()
                            .default("added"),
                    )
                    .col(
                        ColumnDef::new(WatchlistEntry::AddedDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WatchlistEntry::LastUpdated)
                            .timestamp_with_time_zone(),
                    )
                    // Composite key: at most one row per (user, movie), even
                    // under concurrent add requests
                    .primary_key(
                        Index::create()
                            .col(WatchlistEntry::UserId)
                            .col(WatchlistEntry::MovieId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_watchlist_user")
                            .from(WatchlistEntry::Table, WatchlistEntry::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_watchlist_movie")
                            .from(WatchlistEntry::Table, WatchlistEntry::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, added_date) for the newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_watchlist_user_added")
                    .table(WatchlistEntry::Table)
                    .col(WatchlistEntry::UserId)
                    .col(WatchlistEntry::AddedDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WatchlistEntry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WatchlistEntry {
    Table,
    UserId,
    MovieId,
    Status,
    AddedDate,
    LastUpdated,
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

//! Create review rating table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewRating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewRating::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewRating::UserId).integer().not_null())
                    .col(ColumnDef::new(ReviewRating::MovieId).integer().not_null())
                    .col(ColumnDef::new(ReviewRating::Rating).integer().not_null())
                    .col(ColumnDef::new(ReviewRating::ReviewText).text())
                    .col(
                        ColumnDef::new(ReviewRating::ReviewDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_rating_user")
                            .from(ReviewRating::Table, ReviewRating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_rating_movie")
                            .from(ReviewRating::Table, ReviewRating::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (favorite-genre aggregation, review counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_rating_user_id")
                    .table(ReviewRating::Table)
                    .col(ReviewRating::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: movie_id (per-movie review counts and averages)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_rating_movie_id")
                    .table(ReviewRating::Table)
                    .col(ReviewRating::MovieId)
                    .to_owned(),
            )
            .await?;

        // Index: review_date (friend activity feed, newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_rating_review_date")
                    .table(ReviewRating::Table)
                    .col(ReviewRating::ReviewDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewRating::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReviewRating {
    Table,
    Id,
    UserId,
    MovieId,
    Rating,
    ReviewText,
    ReviewDate,
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

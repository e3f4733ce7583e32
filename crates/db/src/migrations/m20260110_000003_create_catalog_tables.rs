//! Create movie catalog tables migration (movie, genre, movie_genre).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movie::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movie::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Movie::Synopsis).text())
                    .col(ColumnDef::new(Movie::Director).string_len(128))
                    .col(
                        ColumnDef::new(Movie::ReleaseYear)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Movie::PosterPath).string_len(255))
                    .col(
                        ColumnDef::new(Movie::AvgRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Movie::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: title (substring search scans benefit from the stats anyway)
        manager
            .create_index(
                Index::create()
                    .name("idx_movie_title")
                    .table(Movie::Table)
                    .col(Movie::Title)
                    .to_owned(),
            )
            .await?;

        // Index: release_year (year filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_movie_release_year")
                    .table(Movie::Table)
                    .col(Movie::ReleaseYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genre::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Genre::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenre::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MovieGenre::MovieId).integer().not_null())
                    .col(ColumnDef::new(MovieGenre::GenreId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(MovieGenre::MovieId)
                            .col(MovieGenre::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_movie")
                            .from(MovieGenre::Table, MovieGenre::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_genre")
                            .from(MovieGenre::Table, MovieGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: genre_id (genre filter joins come in from the genre side)
        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genre_genre_id")
                    .table(MovieGenre::Table)
                    .col(MovieGenre::GenreId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieGenre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Movie {
    Table,
    Id,
    Title,
    Synopsis,
    Director,
    ReleaseYear,
    PosterPath,
    AvgRating,
    CreatedAt,
}

#[derive(Iden)]
enum Genre {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum MovieGenre {
    Table,
    MovieId,
    GenreId,
}

//! Watchlist repository.

use std::sync::Arc;

use crate::entities::{
    WatchlistEntry,
    watchlist_entry::{self, WatchStatus},
};
use cinelog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, Set, SqlErr, Statement, Value,
};

/// A watchlist entry joined with its movie and aggregated genre string.
#[derive(Debug, Clone, FromQueryResult)]
pub struct WatchlistMovieRow {
    pub movie_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_year: i32,
    pub avg_rating: f64,
    pub genres: Option<String>,
    pub status: WatchStatus,
    pub added_date: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Watchlist repository for database operations.
#[derive(Clone)]
pub struct WatchlistRepository {
    db: Arc<DatabaseConnection>,
}

impl WatchlistRepository {
    /// Create a new watchlist repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's entry for a movie.
    pub async fn find_entry(
        &self,
        user_id: i32,
        movie_id: i32,
    ) -> AppResult<Option<watchlist_entry::Model>> {
        WatchlistEntry::find_by_id((user_id, movie_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's watchlist joined with movie data, newest-added first.
    /// `limit` bounds the result for dashboard slices; `None` returns the
    /// whole list.
    pub async fn find_for_user(
        &self,
        user_id: i32,
        limit: Option<u64>,
    ) -> AppResult<Vec<WatchlistMovieRow>> {
        let mut params: Vec<Value> = vec![user_id.into()];

        let limit_clause = match limit {
            Some(n) => {
                params.push((n as i64).into());
                format!("LIMIT ${}", params.len())
            }
            None => String::new(),
        };

        let sql = format!(
            r"
            SELECT m.id AS movie_id, m.title, m.poster_path, m.release_year,
                   m.avg_rating, w.status, w.added_date,
                   STRING_AGG(DISTINCT g.name, ', ') AS genres
            FROM watchlist_entry w
            JOIN movie m ON m.id = w.movie_id
            LEFT JOIN movie_genre mg ON mg.movie_id = m.id
            LEFT JOIN genre g ON g.id = mg.genre_id
            WHERE w.user_id = $1
            GROUP BY m.id, m.title, m.poster_path, m.release_year, m.avg_rating,
                     w.status, w.added_date
            ORDER BY w.added_date DESC
            {limit_clause}
            ",
        );

        WatchlistMovieRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            params,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new entry.
    ///
    /// The composite primary key closes the read-then-insert race: a
    /// concurrent duplicate surfaces as a unique-constraint violation, which
    /// is reported as Conflict just like the pre-read path.
    pub async fn insert(
        &self,
        user_id: i32,
        movie_id: i32,
        status: WatchStatus,
    ) -> AppResult<watchlist_entry::Model> {
        let model = watchlist_entry::ActiveModel {
            user_id: Set(user_id),
            movie_id: Set(movie_id),
            status: Set(status),
            added_date: Set(chrono::Utc::now().into()),
            last_updated: Set(None),
        };

        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::Conflict("Movie is already in your watchlist".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Update the status of an entry. A missing entry is not an error; zero
    /// rows are simply affected.
    pub async fn set_status(
        &self,
        user_id: i32,
        movie_id: i32,
        status: WatchStatus,
    ) -> AppResult<()> {
        WatchlistEntry::update_many()
            .set(watchlist_entry::ActiveModel {
                status: Set(status),
                last_updated: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .filter(watchlist_entry::Column::UserId.eq(user_id))
            .filter(watchlist_entry::Column::MovieId.eq(movie_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Remove an entry. Deleting a non-member pair is a no-op.
    pub async fn delete(&self, user_id: i32, movie_id: i32) -> AppResult<()> {
        WatchlistEntry::delete_many()
            .filter(watchlist_entry::Column::UserId.eq(user_id))
            .filter(watchlist_entry::Column::MovieId.eq(movie_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Count a user's entries with the given status.
    pub async fn count_by_status(&self, user_id: i32, status: WatchStatus) -> AppResult<u64> {
        WatchlistEntry::find()
            .filter(watchlist_entry::Column::UserId.eq(user_id))
            .filter(watchlist_entry::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

//! Review rating repository.

use std::sync::Arc;

use crate::entities::{ReviewRating, review_rating};
use cinelog_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, Statement, Value,
};

/// A genre a user gravitates to, inferred from their high ratings.
#[derive(Debug, Clone, FromQueryResult)]
pub struct FavoriteGenreRow {
    pub genre_id: i32,
    pub name: String,
    pub rated: i64,
}

/// A friend's review joined with reviewer and movie.
#[derive(Debug, Clone, FromQueryResult)]
pub struct FriendReviewRow {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub reviewer_name: Option<String>,
    pub movie_id: i32,
    pub movie_title: String,
    pub rating: i32,
    pub review_text: Option<String>,
    pub review_date: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Review rating repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Number of reviews a user has written.
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        ReviewRating::find()
            .filter(review_rating::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of reviews on a movie.
    pub async fn count_by_movie(&self, movie_id: i32) -> AppResult<u64> {
        ReviewRating::find()
            .filter(review_rating::Column::MovieId.eq(movie_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's favorite genres: genres of the movies they rated 4 stars or
    /// higher, most-rated first.
    pub async fn favorite_genres(
        &self,
        user_id: i32,
        limit: u64,
    ) -> AppResult<Vec<FavoriteGenreRow>> {
        let sql = r"
            SELECT g.id AS genre_id, g.name, COUNT(*) AS rated
            FROM review_rating rr
            JOIN movie_genre mg ON mg.movie_id = rr.movie_id
            JOIN genre g ON g.id = mg.genre_id
            WHERE rr.user_id = $1 AND rr.rating >= 4
            GROUP BY g.id, g.name
            ORDER BY rated DESC
            LIMIT $2
        ";

        FavoriteGenreRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [user_id.into(), (limit as i64).into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Recent reviews by the given users, newest first. An empty user set
    /// short-circuits to an empty list.
    pub async fn recent_by_users(
        &self,
        user_ids: &[i32],
        limit: u64,
    ) -> AppResult<Vec<FriendReviewRow>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<Value> = user_ids.iter().map(|&id| id.into()).collect();
        let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("${i}")).collect();
        params.push((limit as i64).into());
        let limit_pos = params.len();

        let sql = format!(
            r#"
            SELECT rr.id, rr.user_id, u.username, u.name AS reviewer_name,
                   rr.movie_id, m.title AS movie_title, rr.rating,
                   rr.review_text, rr.review_date
            FROM review_rating rr
            JOIN "user" u ON u.id = rr.user_id
            JOIN movie m ON m.id = rr.movie_id
            WHERE rr.user_id IN ({in_list})
            ORDER BY rr.review_date DESC
            LIMIT ${limit_pos}
            "#,
            in_list = placeholders.join(", "),
        );

        FriendReviewRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            params,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_favorite_genres_rows() {
        let row = btreemap! {
            "genre_id" => Value::from(3),
            "name" => Value::from("Drama"),
            "rated" => Value::from(5_i64),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.favorite_genres(1, 3).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Drama");
        assert_eq!(result[0].rated, 5);
    }

    #[tokio::test]
    async fn test_recent_by_users_empty_set() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ReviewRepository::new(db);
        let result = repo.recent_by_users(&[], 10).await.unwrap();

        assert!(result.is_empty());
    }
}

//! Movie repository.
//!
//! Catalog reads combine entity queries with raw aggregation SQL; the
//! aggregated `genres` column is a `STRING_AGG` over the joined genre names.

use std::sync::Arc;

use crate::entities::{Genre, Movie, MovieGenre, genre, movie, movie_genre};
use cinelog_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Statement, Value,
};

/// Catalog browse filters. Genres are OR-ed; all filter kinds AND together.
#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    /// Genre names; a movie matches if it has any of them.
    pub genres: Vec<String>,
    /// Case-insensitive title substring.
    pub search: Option<String>,
    /// Exact release year.
    pub year: Option<i32>,
}

/// Catalog sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseSort {
    /// Highest rated first, title as tiebreak.
    #[default]
    TopRated,
    /// Alphabetical by title.
    Az,
    /// Most recent release year first, title as tiebreak.
    Latest,
}

impl BrowseSort {
    /// Parse a sort key supplied by a client; unknown keys fall back to
    /// the default ordering.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "az" => Self::Az,
            "latest" => Self::Latest,
            _ => Self::TopRated,
        }
    }

    const fn order_by(self) -> &'static str {
        match self {
            Self::TopRated => "m.avg_rating DESC, m.title ASC",
            Self::Az => "m.title ASC",
            Self::Latest => "m.release_year DESC, m.title ASC",
        }
    }
}

/// A movie with its aggregated genre string.
#[derive(Debug, Clone, FromQueryResult)]
pub struct MovieSummaryRow {
    pub id: i32,
    pub title: String,
    pub synopsis: Option<String>,
    pub director: Option<String>,
    pub release_year: i32,
    pub poster_path: Option<String>,
    pub avg_rating: f64,
    pub genres: Option<String>,
}

/// A shared-genre neighbour of a movie.
#[derive(Debug, Clone, FromQueryResult)]
pub struct SimilarMovieRow {
    pub id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_year: i32,
    pub avg_rating: f64,
    pub genres: Option<String>,
    pub shared_genres: i64,
}

/// A recommendation candidate with community rating rollups.
#[derive(Debug, Clone, FromQueryResult)]
pub struct RecommendedMovieRow {
    pub id: i32,
    pub title: String,
    pub synopsis: Option<String>,
    pub director: Option<String>,
    pub release_year: i32,
    pub poster_path: Option<String>,
    pub avg_rating: f64,
    pub genres: Option<String>,
    pub community_rating: Option<f64>,
    pub review_count: i64,
}

#[derive(FromQueryResult)]
struct CountRow {
    total: i64,
}

#[derive(FromQueryResult)]
struct YearRow {
    release_year: i32,
}

/// Movie repository for database operations.
#[derive(Clone)]
pub struct MovieRepository {
    db: Arc<DatabaseConnection>,
}

impl MovieRepository {
    /// Create a new movie repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a movie by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Movie::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a movie exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Render the browse filter into a WHERE clause and its bind values.
    ///
    /// Placeholders are numbered from `$1`; callers appending their own
    /// values must continue from `params.len() + 1`.
    fn filter_clause(filter: &BrowseFilter) -> (String, Vec<Value>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if !filter.genres.is_empty() {
            let genre_conditions: Vec<String> = filter
                .genres
                .iter()
                .map(|name| {
                    params.push(name.clone().into());
                    format!("g.name = ${}", params.len())
                })
                .collect();
            conditions.push(format!("({})", genre_conditions.join(" OR ")));
        }

        if let Some(search) = filter.search.as_deref() {
            let search = search.trim();
            if !search.is_empty() {
                let pattern = format!("%{}%", search.replace('%', "\\%").replace('_', "\\_"));
                params.push(pattern.into());
                conditions.push(format!("m.title ILIKE ${}", params.len()));
            }
        }

        if let Some(year) = filter.year {
            params.push(year.into());
            conditions.push(format!("m.release_year = ${}", params.len()));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (clause, params)
    }

    /// Browse the catalog with filters, sort, and offset pagination.
    pub async fn browse(
        &self,
        filter: &BrowseFilter,
        sort: BrowseSort,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<MovieSummaryRow>> {
        let (where_clause, mut params) = Self::filter_clause(filter);

        params.push((limit as i64).into());
        let limit_pos = params.len();
        params.push((offset as i64).into());
        let offset_pos = params.len();

        let sql = format!(
            r"
            SELECT m.id, m.title, m.synopsis, m.director, m.release_year,
                   m.poster_path, m.avg_rating,
                   STRING_AGG(DISTINCT g.name, ', ') AS genres
            FROM movie m
            LEFT JOIN movie_genre mg ON mg.movie_id = m.id
            LEFT JOIN genre g ON g.id = mg.genre_id
            {where_clause}
            GROUP BY m.id, m.title, m.synopsis, m.director, m.release_year,
                     m.poster_path, m.avg_rating
            ORDER BY {order_by}
            LIMIT ${limit_pos} OFFSET ${offset_pos}
            ",
            order_by = sort.order_by(),
        );

        MovieSummaryRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            params,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count catalog movies matching the same filter predicate as [`Self::browse`].
    pub async fn count_browse(&self, filter: &BrowseFilter) -> AppResult<i64> {
        let (where_clause, params) = Self::filter_clause(filter);

        let sql = format!(
            r"
            SELECT COUNT(DISTINCT m.id) AS total
            FROM movie m
            LEFT JOIN movie_genre mg ON mg.movie_id = m.id
            LEFT JOIN genre g ON g.id = mg.genre_id
            {where_clause}
            ",
        );

        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            params,
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map_or(0, |r| r.total))
    }

    /// All genres, alphabetically.
    pub async fn genres(&self) -> AppResult<Vec<genre::Model>> {
        Genre::find()
            .order_by_asc(genre::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Distinct release years, newest first. Placeholder years (<= 0) are
    /// excluded from the filter vocabulary.
    pub async fn years(&self) -> AppResult<Vec<i32>> {
        let rows = Movie::find()
            .select_only()
            .column(movie::Column::ReleaseYear)
            .distinct()
            .filter(movie::Column::ReleaseYear.gt(0))
            .order_by_desc(movie::Column::ReleaseYear)
            .into_model::<YearRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.release_year).collect())
    }

    /// A single movie with its aggregated genre string.
    pub async fn find_detail(&self, movie_id: i32) -> AppResult<Option<MovieSummaryRow>> {
        let sql = r"
            SELECT m.id, m.title, m.synopsis, m.director, m.release_year,
                   m.poster_path, m.avg_rating,
                   STRING_AGG(DISTINCT g.name, ', ') AS genres
            FROM movie m
            LEFT JOIN movie_genre mg ON mg.movie_id = m.id
            LEFT JOIN genre g ON g.id = mg.genre_id
            WHERE m.id = $1
            GROUP BY m.id, m.title, m.synopsis, m.director, m.release_year,
                     m.poster_path, m.avg_rating
        ";

        MovieSummaryRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [movie_id.into()],
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Genre IDs attached to a movie.
    pub async fn genre_ids(&self, movie_id: i32) -> AppResult<Vec<i32>> {
        let rows = MovieGenre::find()
            .filter(movie_genre::Column::MovieId.eq(movie_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.genre_id).collect())
    }

    /// Movies sharing at least one of the given genres, the movie itself
    /// excluded, ranked by shared-genre count then catalog rating.
    pub async fn similar(
        &self,
        movie_id: i32,
        genre_ids: &[i32],
        limit: u64,
    ) -> AppResult<Vec<SimilarMovieRow>> {
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<Value> = genre_ids.iter().map(|&id| id.into()).collect();
        let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("${i}")).collect();

        params.push(movie_id.into());
        let movie_pos = params.len();
        params.push((limit as i64).into());
        let limit_pos = params.len();

        let sql = format!(
            r"
            SELECT m.id, m.title, m.poster_path, m.release_year, m.avg_rating,
                   STRING_AGG(DISTINCT g.name, ', ') AS genres,
                   COUNT(DISTINCT mg.genre_id) AS shared_genres
            FROM movie m
            JOIN movie_genre mg ON mg.movie_id = m.id
            LEFT JOIN genre g ON g.id = mg.genre_id
            WHERE mg.genre_id IN ({in_list}) AND m.id <> ${movie_pos}
            GROUP BY m.id, m.title, m.poster_path, m.release_year, m.avg_rating
            ORDER BY shared_genres DESC, m.avg_rating DESC
            LIMIT ${limit_pos}
            ",
            in_list = placeholders.join(", "),
        );

        SimilarMovieRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            params,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Recommendation candidates in the given genres that `user_id` has not
    /// reviewed yet, ranked by community rating then review volume.
    pub async fn recommended_in_genres(
        &self,
        genre_ids: &[i32],
        user_id: i32,
        limit: u64,
    ) -> AppResult<Vec<RecommendedMovieRow>> {
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<Value> = genre_ids.iter().map(|&id| id.into()).collect();
        let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("${i}")).collect();

        params.push(user_id.into());
        let user_pos = params.len();
        params.push((limit as i64).into());
        let limit_pos = params.len();

        let sql = format!(
            r"
            SELECT m.id, m.title, m.synopsis, m.director, m.release_year,
                   m.poster_path, m.avg_rating,
                   STRING_AGG(DISTINCT g.name, ', ') AS genres,
                   AVG(rr.rating)::double precision AS community_rating,
                   COUNT(DISTINCT rr.id) AS review_count
            FROM movie m
            JOIN movie_genre fmg ON fmg.movie_id = m.id
            LEFT JOIN movie_genre mg ON mg.movie_id = m.id
            LEFT JOIN genre g ON g.id = mg.genre_id
            LEFT JOIN review_rating rr ON rr.movie_id = m.id
            WHERE fmg.genre_id IN ({in_list})
              AND m.id NOT IN (SELECT movie_id FROM review_rating WHERE user_id = ${user_pos})
            GROUP BY m.id, m.title, m.synopsis, m.director, m.release_year,
                     m.poster_path, m.avg_rating
            ORDER BY COALESCE(AVG(rr.rating), 0) DESC, COUNT(DISTINCT rr.id) DESC
            LIMIT ${limit_pos}
            ",
            in_list = placeholders.join(", "),
        );

        RecommendedMovieRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            params,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Globally top-rated movies by community rating; the recommendation
    /// fallback for users with no usable rating history.
    pub async fn top_rated_by_community(&self, limit: u64) -> AppResult<Vec<RecommendedMovieRow>> {
        let sql = r"
            SELECT m.id, m.title, m.synopsis, m.director, m.release_year,
                   m.poster_path, m.avg_rating,
                   STRING_AGG(DISTINCT g.name, ', ') AS genres,
                   AVG(rr.rating)::double precision AS community_rating,
                   COUNT(DISTINCT rr.id) AS review_count
            FROM movie m
            LEFT JOIN movie_genre mg ON mg.movie_id = m.id
            LEFT JOIN genre g ON g.id = mg.genre_id
            LEFT JOIN review_rating rr ON rr.movie_id = m.id
            GROUP BY m.id, m.title, m.synopsis, m.director, m.release_year,
                     m.poster_path, m.avg_rating
            ORDER BY COALESCE(AVG(rr.rating), 0) DESC, COUNT(DISTINCT rr.id) DESC, m.title ASC
            LIMIT $1
        ";

        RecommendedMovieRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [(limit as i64).into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}

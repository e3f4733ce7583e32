//! Watchlist service.

use cinelog_common::{AppError, AppResult};
use cinelog_db::{
    entities::watchlist_entry::{self, WatchStatus},
    repositories::{MovieRepository, WatchlistMovieRow, WatchlistRepository},
};

/// Membership state of a movie in a user's watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchlistStatus {
    pub in_watchlist: bool,
    pub status: Option<WatchStatus>,
}

/// Watchlist service for business logic.
#[derive(Clone)]
pub struct WatchlistService {
    watchlist_repo: WatchlistRepository,
    movie_repo: MovieRepository,
}

impl WatchlistService {
    /// Create a new watchlist service.
    #[must_use]
    pub const fn new(watchlist_repo: WatchlistRepository, movie_repo: MovieRepository) -> Self {
        Self {
            watchlist_repo,
            movie_repo,
        }
    }

    /// A user's full watchlist, newest-added first.
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<WatchlistMovieRow>> {
        self.watchlist_repo.find_for_user(user_id, None).await
    }

    /// The most recently added entries, for the dashboard.
    pub async fn recent(&self, user_id: i32, limit: u64) -> AppResult<Vec<WatchlistMovieRow>> {
        self.watchlist_repo
            .find_for_user(user_id, Some(limit))
            .await
    }

    /// Membership check for a (user, movie) pair.
    pub async fn status(&self, user_id: i32, movie_id: i32) -> AppResult<WatchlistStatus> {
        let entry = self.watchlist_repo.find_entry(user_id, movie_id).await?;

        Ok(WatchlistStatus {
            in_watchlist: entry.is_some(),
            status: entry.map(|e| e.status),
        })
    }

    /// Add a movie to a user's watchlist.
    ///
    /// The pre-read gives duplicate adds a friendly Conflict on the common
    /// path; a concurrent duplicate insert is caught by the composite key
    /// and reported the same way.
    pub async fn add(
        &self,
        user_id: i32,
        movie_id: i32,
        status: WatchStatus,
    ) -> AppResult<watchlist_entry::Model> {
        if !self.movie_repo.exists(movie_id).await? {
            return Err(AppError::MovieNotFound(movie_id));
        }

        if self
            .watchlist_repo
            .find_entry(user_id, movie_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Movie is already in your watchlist".to_string(),
            ));
        }

        self.watchlist_repo.insert(user_id, movie_id, status).await
    }

    /// Change the status of an entry. Updating a pair that is not in the
    /// list affects nothing and is not an error.
    pub async fn set_status(
        &self,
        user_id: i32,
        movie_id: i32,
        status: WatchStatus,
    ) -> AppResult<()> {
        self.watchlist_repo
            .set_status(user_id, movie_id, status)
            .await
    }

    /// Remove a movie from a user's watchlist. Idempotent.
    pub async fn remove(&self, user_id: i32, movie_id: i32) -> AppResult<()> {
        self.watchlist_repo.delete(user_id, movie_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cinelog_db::entities::movie;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_movie(id: i32) -> movie::Model {
        movie::Model {
            id,
            title: "Heat".to_string(),
            synopsis: None,
            director: Some("Michael Mann".to_string()),
            release_year: 1995,
            poster_path: None,
            avg_rating: 8.3,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_entry(user_id: i32, movie_id: i32) -> watchlist_entry::Model {
        watchlist_entry::Model {
            user_id,
            movie_id,
            status: WatchStatus::Added,
            added_date: Utc::now().into(),
            last_updated: None,
        }
    }

    #[tokio::test]
    async fn test_add_movie_not_found() {
        let watchlist_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let movie_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<movie::Model>::new()])
                .into_connection(),
        );

        let service = WatchlistService::new(
            WatchlistRepository::new(watchlist_db),
            MovieRepository::new(movie_db),
        );

        let result = service.add(1, 42, WatchStatus::Added).await;
        assert!(matches!(result, Err(AppError::MovieNotFound(42))));
    }

    #[tokio::test]
    async fn test_add_duplicate_is_conflict() {
        let watchlist_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_entry(1, 7)]])
                .into_connection(),
        );
        let movie_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_movie(7)]])
                .into_connection(),
        );

        let service = WatchlistService::new(
            WatchlistRepository::new(watchlist_db),
            MovieRepository::new(movie_db),
        );

        let result = service.add(1, 7, WatchStatus::Added).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_add_inserts_entry() {
        let watchlist_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // pre-read finds nothing, insert returns the row
                .append_query_results([Vec::<watchlist_entry::Model>::new()])
                .append_query_results([[create_test_entry(1, 7)]])
                .into_connection(),
        );
        let movie_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_movie(7)]])
                .into_connection(),
        );

        let service = WatchlistService::new(
            WatchlistRepository::new(watchlist_db),
            MovieRepository::new(movie_db),
        );

        let entry = service.add(1, 7, WatchStatus::Added).await.unwrap();
        assert_eq!(entry.movie_id, 7);
        assert_eq!(entry.status, WatchStatus::Added);
    }

    #[tokio::test]
    async fn test_status_for_non_member() {
        let watchlist_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<watchlist_entry::Model>::new()])
                .into_connection(),
        );
        let movie_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = WatchlistService::new(
            WatchlistRepository::new(watchlist_db),
            MovieRepository::new(movie_db),
        );

        let status = service.status(1, 7).await.unwrap();
        assert!(!status.in_watchlist);
        assert!(status.status.is_none());
    }

    #[tokio::test]
    async fn test_remove_non_member_is_ok() {
        let watchlist_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let movie_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = WatchlistService::new(
            WatchlistRepository::new(watchlist_db),
            MovieRepository::new(movie_db),
        );

        service.remove(1, 99).await.unwrap();
    }
}

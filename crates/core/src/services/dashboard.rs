//! Dashboard aggregation service.
//!
//! Read-only rollups for the signed-in user's landing page: stats counters,
//! naive genre-based recommendations, and the friend activity feed.

use cinelog_common::AppResult;
use cinelog_db::{
    entities::watchlist_entry::WatchStatus,
    repositories::{
        FriendRepository, FriendReviewRow, MovieRepository, RecommendedMovieRow, ReviewRepository,
        WatchEventRepository, WatchlistRepository,
    },
};
use serde::Serialize;

/// Counters shown at the top of the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub watchlist: u64,
    pub watched: u64,
    pub friends: u64,
    pub reviews: u64,
    pub upcoming_events: u64,
}

/// A recommendation batch plus what it was derived from.
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub movies: Vec<RecommendedMovieRow>,
    /// Favorite genre names, or `["Popular movies"]` for the fallback.
    pub based_on: Vec<String>,
}

/// Dashboard service for business logic.
#[derive(Clone)]
pub struct DashboardService {
    watchlist_repo: WatchlistRepository,
    friend_repo: FriendRepository,
    review_repo: ReviewRepository,
    event_repo: WatchEventRepository,
    movie_repo: MovieRepository,
}

impl DashboardService {
    /// How many favorite genres feed the recommendation query.
    const FAVORITE_GENRE_LIMIT: u64 = 3;

    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        watchlist_repo: WatchlistRepository,
        friend_repo: FriendRepository,
        review_repo: ReviewRepository,
        event_repo: WatchEventRepository,
        movie_repo: MovieRepository,
    ) -> Self {
        Self {
            watchlist_repo,
            friend_repo,
            review_repo,
            event_repo,
            movie_repo,
        }
    }

    /// Per-user counters: to-watch and watched entries, friends, reviews,
    /// and upcoming hosted events.
    pub async fn stats(&self, user_id: i32) -> AppResult<DashboardStats> {
        let watchlist = self
            .watchlist_repo
            .count_by_status(user_id, WatchStatus::Added)
            .await?;
        let watched = self
            .watchlist_repo
            .count_by_status(user_id, WatchStatus::Completed)
            .await?;
        let friends = self.friend_repo.count_for_user(user_id).await?;
        let reviews = self.review_repo.count_by_user(user_id).await?;
        let upcoming_events = self.event_repo.count_upcoming_hosted(user_id).await?;

        Ok(DashboardStats {
            watchlist,
            watched,
            friends,
            reviews,
            upcoming_events,
        })
    }

    /// Genre-based recommendations.
    ///
    /// Favorite genres are inferred from the user's ratings of 4+; movies in
    /// those genres that the user has not reviewed yet are ranked by
    /// community rating. A user with no qualifying ratings gets the global
    /// top list instead.
    pub async fn recommended(&self, user_id: i32, limit: u64) -> AppResult<Recommendations> {
        let favorites = self
            .review_repo
            .favorite_genres(user_id, Self::FAVORITE_GENRE_LIMIT)
            .await?;

        if favorites.is_empty() {
            let movies = self.movie_repo.top_rated_by_community(limit).await?;
            return Ok(Recommendations {
                movies,
                based_on: vec!["Popular movies".to_string()],
            });
        }

        let genre_ids: Vec<i32> = favorites.iter().map(|g| g.genre_id).collect();
        let movies = self
            .movie_repo
            .recommended_in_genres(&genre_ids, user_id, limit)
            .await?;

        Ok(Recommendations {
            movies,
            based_on: favorites.into_iter().map(|g| g.name).collect(),
        })
    }

    /// Recent reviews posted by the user's friends, newest first. No
    /// friends means no activity, not an error.
    pub async fn recent_activity(
        &self,
        user_id: i32,
        limit: u64,
    ) -> AppResult<Vec<FriendReviewRow>> {
        let friend_ids = self.friend_repo.friend_ids(user_id).await?;

        if friend_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.review_repo.recent_by_users(&friend_ids, limit).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinelog_db::entities::friend;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn recommended_row(id: i32, title: &str, genres: &str) -> BTreeMap<&'static str, Value> {
        btreemap! {
            "id" => Value::from(id),
            "title" => Value::from(title),
            "synopsis" => Value::String(None),
            "director" => Value::String(None),
            "release_year" => Value::from(2020),
            "poster_path" => Value::String(None),
            "avg_rating" => Value::from(7.5),
            "genres" => Value::from(genres),
            "community_rating" => Value::from(4.5),
            "review_count" => Value::from(12_i64),
        }
    }

    fn favorite_row(genre_id: i32, name: &str, rated: i64) -> BTreeMap<&'static str, Value> {
        btreemap! {
            "genre_id" => Value::from(genre_id),
            "name" => Value::from(name),
            "rated" => Value::from(rated),
        }
    }

    fn service_with(
        review_db: Arc<sea_orm::DatabaseConnection>,
        movie_db: Arc<sea_orm::DatabaseConnection>,
        friend_db: Arc<sea_orm::DatabaseConnection>,
    ) -> DashboardService {
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        DashboardService::new(
            WatchlistRepository::new(empty()),
            FriendRepository::new(friend_db),
            ReviewRepository::new(review_db),
            WatchEventRepository::new(empty()),
            MovieRepository::new(movie_db),
        )
    }

    #[tokio::test]
    async fn test_recommended_falls_back_to_popular() {
        let review_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // no favorite genres
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );
        let movie_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[recommended_row(1, "Heat", "Crime")]])
                .into_connection(),
        );
        let friend_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let recs = service_with(review_db, movie_db, friend_db)
            .recommended(1, 6)
            .await
            .unwrap();

        assert_eq!(recs.based_on, vec!["Popular movies".to_string()]);
        assert_eq!(recs.movies.len(), 1);
    }

    #[tokio::test]
    async fn test_recommended_uses_favorite_genres() {
        let review_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[favorite_row(3, "Drama", 5)]])
                .into_connection(),
        );
        let movie_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[recommended_row(2, "Ran", "Drama")]])
                .into_connection(),
        );
        let friend_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let recs = service_with(review_db, movie_db, friend_db)
            .recommended(1, 6)
            .await
            .unwrap();

        assert_eq!(recs.based_on, vec!["Drama".to_string()]);
        assert_eq!(recs.movies[0].title, "Ran");
    }

    #[tokio::test]
    async fn test_recent_activity_empty_friend_set() {
        let review_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let movie_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let friend_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<friend::Model>::new()])
                .into_connection(),
        );

        let activity = service_with(review_db, movie_db, friend_db)
            .recent_activity(1, 10)
            .await
            .unwrap();

        assert!(activity.is_empty());
    }
}

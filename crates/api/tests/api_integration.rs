//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cinelog_api::{middleware::AppState, router as api_router};
use cinelog_core::{
    CommentService, DashboardService, LikeService, MovieService, PostService, UserService,
    WatchlistService,
};
use cinelog_db::repositories::{
    CommentRepository, FriendRepository, LikeRepository, MovieRepository, PostRepository,
    ReviewRepository, SessionRepository, UserRepository, WatchEventRepository, WatchlistRepository,
};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

/// A mock connection with nothing queued; endpoints that hit it fail loudly.
fn empty_db() -> Arc<DatabaseConnection> {
    Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

/// Build an `AppState` where every service runs over the given movie-side
/// mock and otherwise empty mocks.
fn state_with_movie_db(movie_db: Arc<DatabaseConnection>) -> AppState {
    let review_db = empty_db();

    AppState {
        user_service: UserService::new(
            UserRepository::new(empty_db()),
            SessionRepository::new(empty_db()),
        ),
        movie_service: MovieService::new(
            MovieRepository::new(Arc::clone(&movie_db)),
            ReviewRepository::new(Arc::clone(&review_db)),
        ),
        watchlist_service: WatchlistService::new(
            WatchlistRepository::new(empty_db()),
            MovieRepository::new(Arc::clone(&movie_db)),
        ),
        post_service: PostService::new(
            PostRepository::new(empty_db()),
            LikeRepository::new(empty_db()),
            MovieRepository::new(Arc::clone(&movie_db)),
        ),
        comment_service: CommentService::new(
            CommentRepository::new(empty_db()),
            PostRepository::new(empty_db()),
        ),
        like_service: LikeService::new(
            LikeRepository::new(empty_db()),
            PostRepository::new(empty_db()),
        ),
        dashboard_service: DashboardService::new(
            WatchlistRepository::new(empty_db()),
            FriendRepository::new(empty_db()),
            ReviewRepository::new(review_db),
            WatchEventRepository::new(empty_db()),
            MovieRepository::new(movie_db),
        ),
        session_cookie: "cinelog_session".to_string(),
    }
}

fn app(state: AppState) -> Router {
    Router::new().nest("/api", api_router()).with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn movie_row(id: i32, title: &str) -> BTreeMap<&'static str, Value> {
    use maplit::btreemap;
    btreemap! {
        "id" => Value::from(id),
        "title" => Value::from(title),
        "synopsis" => Value::String(None),
        "director" => Value::String(None),
        "release_year" => Value::from(2020),
        "poster_path" => Value::from("poster.jpg"),
        "avg_rating" => Value::from(8.25),
        "genres" => Value::from("Crime, Thriller"),
    }
}

#[tokio::test]
async fn test_watchlist_requires_auth() {
    let response = app(state_with_movie_db(empty_db()))
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_watchlist_add_requires_auth() {
    let response = app(state_with_movie_db(empty_db()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watchlist")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"movieId": 7}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_watchlist_membership_soft_fails_for_anonymous() {
    let response = app(state_with_movie_db(empty_db()))
        .oneshot(
            Request::builder()
                .uri("/api/watchlist/7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["inWatchlist"], false);
}

#[tokio::test]
async fn test_browse_movies_returns_envelope() {
    let movie_db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![movie_row(1, "Heat")]])
            .append_query_results([vec![maplit::btreemap! {
                "total" => Value::from(1_i64),
            }]])
            .into_connection(),
    );

    let response = app(state_with_movie_db(movie_db))
        .oneshot(
            Request::builder()
                .uri("/api/movies?sort=top-rated")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["movies"][0]["movieId"], 1);
    assert_eq!(json["movies"][0]["avgRating"], "8.2");
    assert_eq!(json["movies"][0]["posterPath"], "/pictures/poster.jpg");
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn test_movie_detail_not_found_is_enveloped() {
    let movie_db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection(),
    );

    let response = app(state_with_movie_db(movie_db))
        .oneshot(
            Request::builder()
                .uri("/api/movies/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_post_delete_requires_auth() {
    let response = app(state_with_movie_db(empty_db()))
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/posts/5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_stats_requires_auth() {
    let response = app(state_with_movie_db(empty_db()))
        .oneshot(
            Request::builder()
                .uri("/api/dashboard/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

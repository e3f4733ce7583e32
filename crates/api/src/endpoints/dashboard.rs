//! Dashboard endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use cinelog_common::AppResult;
use cinelog_core::DashboardStats;
use cinelog_db::repositories::{FriendReviewRow, RecommendedMovieRow};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::watchlist::WatchlistMovieResponse, extractors::AuthUser, middleware::AppState,
    response::ApiResponse,
};

/// Limit query parameter shared by the dashboard list endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize)]
struct StatsPayload {
    stats: DashboardStats,
}

/// GET /dashboard/stats - the signed-in user's counters.
async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<StatsPayload>> {
    let stats = state.dashboard_service.stats(user.id).await?;

    Ok(ApiResponse::ok(StatsPayload { stats }))
}

/// Recommended movie response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedMovieResponse {
    pub movie_id: i32,
    pub title: String,
    pub synopsis: Option<String>,
    pub director: Option<String>,
    pub release_year: i32,
    pub poster_path: Option<String>,
    pub genres: Option<String>,
    /// Community average, absent until somebody reviews the movie
    pub avg_rating: Option<String>,
    pub review_count: i64,
}

impl From<RecommendedMovieRow> for RecommendedMovieResponse {
    fn from(m: RecommendedMovieRow) -> Self {
        Self {
            movie_id: m.id,
            title: m.title,
            synopsis: m.synopsis,
            director: m.director,
            release_year: m.release_year,
            poster_path: m.poster_path.map(|p| format!("/pictures/{p}")),
            genres: m.genres,
            avg_rating: m.community_rating.map(|r| format!("{r:.1}")),
            review_count: m.review_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendedPayload {
    movies: Vec<RecommendedMovieResponse>,
    based_on: Vec<String>,
}

/// GET /dashboard/recommended - genre-based recommendations.
async fn recommended(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<ApiResponse<RecommendedPayload>> {
    let limit = query.limit.unwrap_or(6).min(50);
    let recs = state.dashboard_service.recommended(user.id, limit).await?;

    Ok(ApiResponse::ok(RecommendedPayload {
        movies: recs.movies.into_iter().map(Into::into).collect(),
        based_on: recs.based_on,
    }))
}

#[derive(Serialize)]
struct RecentWatchlistPayload {
    items: Vec<WatchlistMovieResponse>,
}

/// GET /dashboard/recent-watchlist - latest watchlist additions.
async fn recent_watchlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<ApiResponse<RecentWatchlistPayload>> {
    let limit = query.limit.unwrap_or(5).min(50);
    let items = state.watchlist_service.recent(user.id, limit).await?;

    Ok(ApiResponse::ok(RecentWatchlistPayload {
        items: items.into_iter().map(Into::into).collect(),
    }))
}

/// A friend activity feed entry. Reviews are the only activity kind.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub name: Option<String>,
    pub movie_id: i32,
    pub movie_title: String,
    pub rating: i32,
    pub review_text: Option<String>,
    pub activity_date: String,
}

impl From<FriendReviewRow> for ActivityResponse {
    fn from(r: FriendReviewRow) -> Self {
        Self {
            kind: "review",
            id: r.id,
            user_id: r.user_id,
            username: r.username,
            name: r.reviewer_name,
            movie_id: r.movie_id,
            movie_title: r.movie_title,
            rating: r.rating,
            review_text: r.review_text,
            activity_date: r.review_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct ActivitiesPayload {
    activities: Vec<ActivityResponse>,
}

/// GET /dashboard/recent-activity - friends' recent reviews.
async fn recent_activity(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<ApiResponse<ActivitiesPayload>> {
    let limit = query.limit.unwrap_or(10).min(50);
    let activities = state
        .dashboard_service
        .recent_activity(user.id, limit)
        .await?;

    Ok(ApiResponse::ok(ActivitiesPayload {
        activities: activities.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/recommended", get(recommended))
        .route("/dashboard/recent-watchlist", get(recent_watchlist))
        .route("/dashboard/recent-activity", get(recent_activity))
}

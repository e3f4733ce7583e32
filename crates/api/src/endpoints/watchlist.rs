//! Watchlist endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use cinelog_common::{AppError, AppResult};
use cinelog_db::{entities::watchlist_entry::WatchStatus, repositories::WatchlistMovieRow};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Watchlist entry response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistMovieResponse {
    pub movie_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_year: i32,
    pub genres: Option<String>,
    pub avg_rating: String,
    pub status: WatchStatus,
    pub added_date: String,
}

impl From<WatchlistMovieRow> for WatchlistMovieResponse {
    fn from(m: WatchlistMovieRow) -> Self {
        Self {
            movie_id: m.movie_id,
            title: m.title,
            poster_path: m.poster_path.map(|p| format!("/pictures/{p}")),
            release_year: m.release_year,
            genres: m.genres,
            avg_rating: format!("{:.1}", m.avg_rating),
            status: m.status,
            added_date: m.added_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct WatchlistPayload {
    movies: Vec<WatchlistMovieResponse>,
}

/// GET /watchlist - the current user's entries, newest-added first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<WatchlistPayload>> {
    let movies = state.watchlist_service.list(user.id).await?;

    Ok(ApiResponse::ok(WatchlistPayload {
        movies: movies.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusPayload {
    in_watchlist: bool,
    status: Option<WatchStatus>,
}

/// GET /watchlist/{movie_id} - membership check.
///
/// Anonymous callers get `inWatchlist: false` rather than a 401; the
/// frontend renders the same button either way.
async fn status(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> AppResult<ApiResponse<StatusPayload>> {
    let Some(user) = user else {
        return Ok(ApiResponse::ok(StatusPayload {
            in_watchlist: false,
            status: None,
        }));
    };

    let membership = state.watchlist_service.status(user.id, movie_id).await?;

    Ok(ApiResponse::ok(StatusPayload {
        in_watchlist: membership.in_watchlist,
        status: membership.status,
    }))
}

/// Add-to-watchlist request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWatchlistRequest {
    pub movie_id: i32,
    pub status: Option<String>,
}

/// POST /watchlist - add a movie.
async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AddWatchlistRequest>,
) -> AppResult<ApiResponse<()>> {
    let status = match req.status.as_deref() {
        None => WatchStatus::Added,
        Some(raw) => parse_status(raw)?,
    };

    state
        .watchlist_service
        .add(user.id, req.movie_id, status)
        .await?;

    Ok(ApiResponse::message("Movie added to watchlist"))
}

/// Status update request.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PATCH /watchlist/{movie_id} - change an entry's status.
async fn set_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<()>> {
    let status = parse_status(&req.status)?;

    state
        .watchlist_service
        .set_status(user.id, movie_id, status)
        .await?;

    Ok(ApiResponse::message("Watchlist status updated"))
}

/// DELETE /watchlist/{movie_id} - remove an entry (idempotent).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.watchlist_service.remove(user.id, movie_id).await?;

    Ok(ApiResponse::message("Movie removed from watchlist"))
}

fn parse_status(raw: &str) -> AppResult<WatchStatus> {
    WatchStatus::parse(raw).ok_or_else(|| {
        AppError::BadRequest("Invalid status. Must be 'added' or 'completed'".to_string())
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/watchlist", get(list).post(add))
        .route(
            "/watchlist/{movie_id}",
            get(status).patch(set_status).delete(remove),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_accepts_known_values() {
        assert_eq!(parse_status("added").ok(), Some(WatchStatus::Added));
        assert_eq!(parse_status("completed").ok(), Some(WatchStatus::Completed));
    }

    #[test]
    fn test_parse_status_rejects_unknown_value() {
        assert!(matches!(
            parse_status("dropped"),
            Err(AppError::BadRequest(_))
        ));
    }
}

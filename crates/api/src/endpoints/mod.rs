//! API endpoints.

mod dashboard;
mod movies;
mod posts;
mod watchlist;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(movies::router())
        .merge(watchlist::router())
        .merge(posts::router())
        .merge(dashboard::router())
}

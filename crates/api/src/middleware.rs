//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use cinelog_core::{
    CommentService, DashboardService, LikeService, MovieService, PostService, UserService,
    WatchlistService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub movie_service: MovieService,
    pub watchlist_service: WatchlistService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub like_service: LikeService,
    pub dashboard_service: DashboardService,
    /// Name of the session cookie to look for.
    pub session_cookie: String,
}

/// Pull a cookie value out of the Cookie header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Authentication middleware.
///
/// Resolves the session cookie to a user and stores it in request
/// extensions; handlers opt in via `AuthUser` / `MaybeAuthUser`. An absent
/// or stale session is not an error here, only at extraction time.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = cookie_value(req.headers(), &state.session_cookie) {
        match state.user_service.authenticate_by_session(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session cookie did not resolve to a user");
            }
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value_found() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; cinelog_session=tok-1; lang=en"),
        );

        assert_eq!(
            cookie_value(&headers, "cinelog_session"),
            Some("tok-1".to_string())
        );
    }

    #[test]
    fn test_cookie_value_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));

        assert_eq!(cookie_value(&headers, "cinelog_session"), None);
    }

    #[test]
    fn test_cookie_value_no_header() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, "cinelog_session"), None);
    }
}

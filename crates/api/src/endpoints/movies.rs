//! Movie catalog endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use axum_extra::extract::Query;
use cinelog_common::AppResult;
use cinelog_core::{MovieDetail, Pagination};
use cinelog_db::repositories::{BrowseFilter, BrowseSort, MovieSummaryRow, SimilarMovieRow};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Format a poster file name as the path the frontend serves it from.
fn poster_url(poster_path: Option<String>) -> Option<String> {
    poster_path.map(|p| format!("/pictures/{p}"))
}

/// Catalog ratings go out as fixed one-decimal strings.
fn format_rating(avg_rating: f64) -> String {
    format!("{avg_rating:.1}")
}

/// Browse query parameters. `genre` may repeat for OR semantics.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub genre: Vec<String>,
    pub search: Option<String>,
    pub year: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Movie list entry response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub movie_id: i32,
    pub title: String,
    pub synopsis: Option<String>,
    pub director: Option<String>,
    pub release_year: i32,
    pub poster_path: Option<String>,
    pub genres: Option<String>,
    pub avg_rating: String,
}

impl From<MovieSummaryRow> for MovieResponse {
    fn from(m: MovieSummaryRow) -> Self {
        Self {
            movie_id: m.id,
            title: m.title,
            synopsis: m.synopsis,
            director: m.director,
            release_year: m.release_year,
            poster_path: poster_url(m.poster_path),
            genres: m.genres,
            avg_rating: format_rating(m.avg_rating),
        }
    }
}

/// Similar-movie response (card view, no synopsis).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarMovieResponse {
    pub movie_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_year: i32,
    pub genres: Option<String>,
    pub avg_rating: String,
}

impl From<SimilarMovieRow> for SimilarMovieResponse {
    fn from(m: SimilarMovieRow) -> Self {
        Self {
            movie_id: m.id,
            title: m.title,
            poster_path: poster_url(m.poster_path),
            release_year: m.release_year,
            genres: m.genres,
            avg_rating: format_rating(m.avg_rating),
        }
    }
}

#[derive(Serialize)]
struct BrowsePayload {
    movies: Vec<MovieResponse>,
    pagination: Pagination,
}

/// GET /movies - browse the catalog.
async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> AppResult<ApiResponse<BrowsePayload>> {
    // "all" disables the genre filter; same for a non-numeric year
    let genres: Vec<String> = if query.genre.iter().any(|g| g == "all") {
        Vec::new()
    } else {
        query.genre
    };
    let year = query
        .year
        .as_deref()
        .filter(|y| *y != "all")
        .and_then(|y| y.parse().ok());

    let filter = BrowseFilter {
        genres,
        search: query.search,
        year,
    };
    let sort = query
        .sort
        .as_deref()
        .map_or(BrowseSort::TopRated, BrowseSort::parse);

    let (movies, pagination) = state
        .movie_service
        .browse(
            &filter,
            sort,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(cinelog_core::MovieService::DEFAULT_PAGE_SIZE),
        )
        .await?;

    Ok(ApiResponse::ok(BrowsePayload {
        movies: movies.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

/// Genre response for the filter UI.
#[derive(Debug, Serialize)]
pub struct GenreResponse {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize)]
struct GenresPayload {
    genres: Vec<GenreResponse>,
}

/// GET /movies/genres - filter vocabulary.
async fn genres(State(state): State<AppState>) -> AppResult<ApiResponse<GenresPayload>> {
    let genres = state.movie_service.genres().await?;

    Ok(ApiResponse::ok(GenresPayload {
        genres: genres
            .into_iter()
            .map(|g| GenreResponse {
                id: g.id,
                name: g.name,
            })
            .collect(),
    }))
}

#[derive(Serialize)]
struct YearsPayload {
    years: Vec<i32>,
}

/// GET /movies/years - filter vocabulary.
async fn years(State(state): State<AppState>) -> AppResult<ApiResponse<YearsPayload>> {
    let years = state.movie_service.years().await?;
    Ok(ApiResponse::ok(YearsPayload { years }))
}

/// Movie detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailResponse {
    #[serde(flatten)]
    pub movie: MovieResponse,
    pub review_count: u64,
}

#[derive(Serialize)]
struct DetailPayload {
    movie: MovieDetailResponse,
}

/// GET /movies/{movie_id} - movie detail.
async fn detail(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> AppResult<ApiResponse<DetailPayload>> {
    let MovieDetail {
        movie,
        review_count,
    } = state.movie_service.detail(movie_id).await?;

    Ok(ApiResponse::ok(DetailPayload {
        movie: MovieDetailResponse {
            movie: movie.into(),
            review_count,
        },
    }))
}

/// Similar-movies query parameters.
#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize)]
struct SimilarPayload {
    movies: Vec<SimilarMovieResponse>,
}

/// GET /movies/{movie_id}/similar - shared-genre neighbours.
async fn similar(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
    Query(query): Query<SimilarQuery>,
) -> AppResult<ApiResponse<SimilarPayload>> {
    let limit = query
        .limit
        .unwrap_or(cinelog_core::MovieService::DEFAULT_SIMILAR_LIMIT)
        .min(cinelog_core::MovieService::MAX_PAGE_SIZE);

    let movies = state.movie_service.similar(movie_id, limit).await?;

    Ok(ApiResponse::ok(SimilarPayload {
        movies: movies.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(browse))
        .route("/movies/genres", get(genres))
        .route("/movies/years", get(years))
        .route("/movies/{movie_id}", get(detail))
        .route("/movies/{movie_id}/similar", get(similar))
}

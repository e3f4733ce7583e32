//! Movie catalog service.

use cinelog_common::{AppError, AppResult};
use cinelog_db::{
    entities::genre,
    repositories::{
        BrowseFilter, BrowseSort, MovieRepository, MovieSummaryRow, ReviewRepository,
        SimilarMovieRow,
    },
};
use serde::Serialize;

/// Offset pagination metadata returned alongside a browse page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// A movie detail view with its review count.
#[derive(Debug, Clone)]
pub struct MovieDetail {
    pub movie: MovieSummaryRow,
    pub review_count: u64,
}

/// Movie catalog service for business logic.
#[derive(Clone)]
pub struct MovieService {
    movie_repo: MovieRepository,
    review_repo: ReviewRepository,
}

impl MovieService {
    /// Default browse page size.
    pub const DEFAULT_PAGE_SIZE: u64 = 20;
    /// Upper bound on client-supplied page sizes.
    pub const MAX_PAGE_SIZE: u64 = 100;
    /// Default similar-movie list size.
    pub const DEFAULT_SIMILAR_LIMIT: u64 = 8;

    /// Create a new movie service.
    #[must_use]
    pub const fn new(movie_repo: MovieRepository, review_repo: ReviewRepository) -> Self {
        Self {
            movie_repo,
            review_repo,
        }
    }

    /// Browse the catalog. Returns the page of movies plus pagination
    /// metadata computed from a parallel count over the same predicate.
    pub async fn browse(
        &self,
        filter: &BrowseFilter,
        sort: BrowseSort,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<MovieSummaryRow>, Pagination)> {
        let page = page.max(1);
        let limit = limit.clamp(1, Self::MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;

        let movies = self.movie_repo.browse(filter, sort, limit, offset).await?;
        let total = self.movie_repo.count_browse(filter).await?.max(0) as u64;

        let pagination = Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        };

        Ok((movies, pagination))
    }

    /// All genres for the filter UI.
    pub async fn genres(&self) -> AppResult<Vec<genre::Model>> {
        self.movie_repo.genres().await
    }

    /// Distinct release years for the filter UI.
    pub async fn years(&self) -> AppResult<Vec<i32>> {
        self.movie_repo.years().await
    }

    /// Movie detail with aggregated genres and review count.
    pub async fn detail(&self, movie_id: i32) -> AppResult<MovieDetail> {
        let movie = self
            .movie_repo
            .find_detail(movie_id)
            .await?
            .ok_or(AppError::MovieNotFound(movie_id))?;

        let review_count = self.review_repo.count_by_movie(movie_id).await?;

        Ok(MovieDetail {
            movie,
            review_count,
        })
    }

    /// Movies sharing at least one genre with the target, best matches
    /// first. A movie with no genres has no neighbours.
    pub async fn similar(&self, movie_id: i32, limit: u64) -> AppResult<Vec<SimilarMovieRow>> {
        let genre_ids = self.movie_repo.genre_ids(movie_id).await?;
        self.movie_repo.similar(movie_id, &genre_ids, limit).await
    }
}

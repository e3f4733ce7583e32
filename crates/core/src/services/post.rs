//! Discussion post service.

use cinelog_common::{AppError, AppResult};
use cinelog_db::repositories::{
    LikeRepository, MovieRepository, PostRepository, PostWithAuthorRow,
};
use std::collections::HashSet;

/// Maximum accepted length for post and comment bodies, in characters.
pub const MAX_CONTENT_LEN: usize = 8095;

/// Trim a submitted body and enforce the shared content policy.
pub(crate) fn validate_content(content: &str) -> AppResult<&str> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(AppError::BadRequest("Content is too long".to_string()));
    }

    Ok(trimmed)
}

/// A post annotated for a specific viewer.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: PostWithAuthorRow,
    pub liked_by_viewer: bool,
    pub is_author: bool,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    like_repo: LikeRepository,
    movie_repo: MovieRepository,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        like_repo: LikeRepository,
        movie_repo: MovieRepository,
    ) -> Self {
        Self {
            post_repo,
            like_repo,
            movie_repo,
        }
    }

    /// Posts on a movie page, newest first, annotated with the viewer's
    /// like state and authorship. The like annotation is a second query
    /// restricted to the returned post IDs.
    pub async fn list_for_movie(
        &self,
        movie_id: i32,
        viewer: Option<i32>,
    ) -> AppResult<Vec<PostView>> {
        let posts = self.post_repo.find_for_movie(movie_id).await?;

        let liked: HashSet<i32> = match viewer {
            Some(viewer_id) if !posts.is_empty() => {
                let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
                self.like_repo
                    .liked_post_ids(viewer_id, &post_ids)
                    .await?
                    .into_iter()
                    .collect()
            }
            _ => HashSet::new(),
        };

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                liked_by_viewer: liked.contains(&post.id),
                is_author: viewer == Some(post.user_id),
                post,
            })
            .collect())
    }

    /// Create a post on a movie page.
    pub async fn create(&self, movie_id: i32, user_id: i32, content: &str) -> AppResult<PostView> {
        let trimmed = validate_content(content)?;

        if !self.movie_repo.exists(movie_id).await? {
            return Err(AppError::MovieNotFound(movie_id));
        }

        let created = self.post_repo.create(movie_id, user_id, trimmed).await?;

        // Reload with author info for the response
        let post = self
            .post_repo
            .find_with_author(created.id)
            .await?
            .ok_or(AppError::PostNotFound(created.id))?;

        Ok(PostView {
            post,
            liked_by_viewer: false,
            is_author: true,
        })
    }

    /// Delete a post. Only the author may do this; the post's comments and
    /// likes cascade away with it.
    pub async fn delete(&self, post_id: i32, requester_id: i32) -> AppResult<()> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::PostNotFound(post_id))?;

        if post.user_id != requester_id {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        self.post_repo.delete(post).await
    }
}

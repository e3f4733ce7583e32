//! Like toggle service.

use cinelog_common::{AppError, AppResult};
use cinelog_db::repositories::{LikeAction, LikeRepository, PostRepository};

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: LikeRepository, post_repo: PostRepository) -> Self {
        Self {
            like_repo,
            post_repo,
        }
    }

    /// Toggle a like on a post: the first call likes, a repeat call from
    /// the same user unlikes. Returns the action taken and the post's new
    /// like count. Authors cannot like their own posts.
    pub async fn toggle(&self, post_id: i32, user_id: i32) -> AppResult<(LikeAction, i32)> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::PostNotFound(post_id))?;

        if post.user_id == user_id {
            return Err(AppError::BadRequest(
                "You cannot like your own post".to_string(),
            ));
        }

        self.like_repo.toggle(post_id, user_id).await
    }
}

//! Like repository.

use std::sync::Arc;

use crate::entities::{Post, PostLike, post, post_like};
use cinelog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Liked,
    Unliked,
}

impl LikeAction {
    /// The wire representation of this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Unliked => "unliked",
        }
    }
}

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by (post, user).
    pub async fn find(&self, post_id: i32, user_id: i32) -> AppResult<Option<post_like::Model>> {
        PostLike::find_by_id((post_id, user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Of the given posts, the IDs the user has liked. Used to annotate a
    /// page of posts with a second bounded query.
    pub async fn liked_post_ids(&self, user_id: i32, post_ids: &[i32]) -> AppResult<Vec<i32>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let likes = PostLike::find()
            .filter(post_like::Column::UserId.eq(user_id))
            .filter(post_like::Column::PostId.is_in(post_ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(likes.into_iter().map(|l| l.post_id).collect())
    }

    /// Toggle a like and return the action taken plus the post's new
    /// `like_count`.
    ///
    /// The like-row mutation and the counter update run in one transaction;
    /// a failure between them would otherwise leave the denormalized count
    /// out of sync with the `post_like` rows.
    pub async fn toggle(&self, post_id: i32, user_id: i32) -> AppResult<(LikeAction, i32)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = PostLike::find_by_id((post_id, user_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let action = if let Some(like) = existing {
            like.delete(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            Post::update_many()
                .col_expr(
                    post::Column::LikeCount,
                    Expr::cust("GREATEST(like_count - 1, 0)"),
                )
                .filter(post::Column::Id.eq(post_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            LikeAction::Unliked
        } else {
            let model = post_like::ActiveModel {
                post_id: Set(post_id),
                user_id: Set(user_id),
                created_at: Set(chrono::Utc::now().into()),
            };
            model
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            Post::update_many()
                .col_expr(
                    post::Column::LikeCount,
                    Expr::col(post::Column::LikeCount).add(1),
                )
                .filter(post::Column::Id.eq(post_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            LikeAction::Liked
        };

        let like_count = Post::find_by_id(post_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .map_or(0, |p| p.like_count);

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((action, like_count))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_like(post_id: i32, user_id: i32) -> post_like::Model {
        post_like::Model {
            post_id,
            user_id,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_post(id: i32, like_count: i32) -> post::Model {
        post::Model {
            id,
            movie_id: 1,
            user_id: 9,
            content: "Great movie".to_string(),
            like_count,
            comment_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_toggle_likes_when_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // 1: existing-like lookup (none), 2: insert returning,
                // 3: reload post for the fresh counter
                .append_query_results([Vec::<post_like::Model>::new()])
                .append_query_results([[create_test_like(5, 2)]])
                .append_query_results([[create_test_post(5, 1)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let (action, like_count) = repo.toggle(5, 2).await.unwrap();

        assert_eq!(action, LikeAction::Liked);
        assert_eq!(like_count, 1);
    }

    #[tokio::test]
    async fn test_toggle_unlikes_when_present() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like(5, 2)]])
                .append_query_results([[create_test_post(5, 0)]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let (action, like_count) = repo.toggle(5, 2).await.unwrap();

        assert_eq!(action, LikeAction::Unliked);
        assert_eq!(like_count, 0);
    }

    #[tokio::test]
    async fn test_liked_post_ids_empty_input() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = LikeRepository::new(db);
        let result = repo.liked_post_ids(1, &[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_liked_post_ids_filters_to_likes() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like(1, 7), create_test_like(3, 7)]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let result = repo.liked_post_ids(7, &[1, 2, 3]).await.unwrap();

        assert_eq!(result, vec![1, 3]);
    }
}

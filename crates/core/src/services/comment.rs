//! Comment service.

use cinelog_common::{AppError, AppResult};
use cinelog_db::repositories::{CommentRepository, CommentWithAuthorRow, PostRepository};

use crate::services::post::validate_content;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// Comments under a post in chronological reading order (oldest first,
    /// the opposite of post ordering).
    pub async fn list(&self, post_id: i32) -> AppResult<Vec<CommentWithAuthorRow>> {
        if self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(AppError::PostNotFound(post_id));
        }

        self.comment_repo.find_for_post(post_id).await
    }

    /// Add a comment under a post. The parent's `comment_count` is bumped
    /// in the same transaction as the insert.
    pub async fn add(
        &self,
        post_id: i32,
        user_id: i32,
        content: &str,
    ) -> AppResult<CommentWithAuthorRow> {
        let trimmed = validate_content(content)?;

        if self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(AppError::PostNotFound(post_id));
        }

        let created = self.comment_repo.create(post_id, user_id, trimmed).await?;

        self.comment_repo
            .find_with_author(created.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", created.id)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cinelog_db::entities::{comment, post};
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn create_test_post(id: i32) -> post::Model {
        post::Model {
            id,
            movie_id: 1,
            user_id: 3,
            content: "Great movie".to_string(),
            like_count: 0,
            comment_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_missing_post_is_not_found() {
        let comment_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            PostRepository::new(post_db),
        );

        let result = service.list(5).await;
        assert!(matches!(result, Err(AppError::PostNotFound(5))));
    }

    #[tokio::test]
    async fn test_add_rejects_empty_content() {
        let comment_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let post_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            PostRepository::new(post_db),
        );

        let result = service.add(5, 2, "   ").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_creates_and_returns_with_author() {
        let created = comment::Model {
            id: 8,
            post_id: 5,
            user_id: 2,
            content: "Agreed".to_string(),
            created_at: Utc::now().into(),
        };
        let with_author = btreemap! {
            "id" => Value::from(8),
            "post_id" => Value::from(5),
            "user_id" => Value::from(2),
            "content" => Value::from("Agreed"),
            "created_at" => Value::from(Utc::now().fixed_offset()),
            "username" => Value::from("bob"),
            "author_name" => Value::String(None),
        };

        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created.clone()]])
                .append_query_results([[with_author]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post(5)]])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            PostRepository::new(post_db),
        );

        let comment = service.add(5, 2, " Agreed ").await.unwrap();
        assert_eq!(comment.username, "bob");
        assert_eq!(comment.content, "Agreed");
    }
}

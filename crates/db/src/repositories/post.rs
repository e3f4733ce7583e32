//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use cinelog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, ModelTrait,
    Set, Statement,
};

/// A post joined with its author.
#[derive(Debug, Clone, FromQueryResult)]
pub struct PostWithAuthorRow {
    pub id: i32,
    pub movie_id: i32,
    pub user_id: i32,
    pub content: String,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub username: String,
    pub author_name: Option<String>,
}

const POST_WITH_AUTHOR: &str = r#"
    SELECT p.id, p.movie_id, p.user_id, p.content, p.like_count,
           p.comment_count, p.created_at,
           u.username, u.name AS author_name
    FROM post p
    JOIN "user" u ON u.id = p.user_id
"#;

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Posts on a movie page, newest first, with author info.
    pub async fn find_for_movie(&self, movie_id: i32) -> AppResult<Vec<PostWithAuthorRow>> {
        let sql = format!(
            "{POST_WITH_AUTHOR} WHERE p.movie_id = $1 ORDER BY p.created_at DESC"
        );

        PostWithAuthorRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            [movie_id.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A single post with author info.
    pub async fn find_with_author(&self, post_id: i32) -> AppResult<Option<PostWithAuthorRow>> {
        let sql = format!("{POST_WITH_AUTHOR} WHERE p.id = $1");

        PostWithAuthorRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            [post_id.into()],
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(
        &self,
        movie_id: i32,
        user_id: i32,
        content: &str,
    ) -> AppResult<post::Model> {
        let model = post::ActiveModel {
            movie_id: Set(movie_id),
            user_id: Set(user_id),
            content: Set(content.to_string()),
            like_count: Set(0),
            comment_count: Set(0),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post. Comments and likes cascade away with it.
    pub async fn delete(&self, post: post::Model) -> AppResult<()> {
        post.delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn create_test_post(id: i32, movie_id: i32, user_id: i32) -> post::Model {
        post::Model {
            id,
            movie_id,
            user_id,
            content: "Great movie".to_string(),
            like_count: 0,
            comment_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn author_row(id: i32, user_id: i32, username: &str) -> BTreeMap<&'static str, Value> {
        btreemap! {
            "id" => Value::from(id),
            "movie_id" => Value::from(1),
            "user_id" => Value::from(user_id),
            "content" => Value::from("Great movie"),
            "like_count" => Value::from(0),
            "comment_count" => Value::from(0),
            "created_at" => Value::from(Utc::now().fixed_offset()),
            "username" => Value::from(username),
            "author_name" => Value::String(None),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let post = create_test_post(1, 2, 3);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert_eq!(result.unwrap().movie_id, 2);
    }

    #[tokio::test]
    async fn test_find_for_movie_joins_author() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author_row(1, 3, "alice"), author_row(2, 4, "bob")]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_for_movie(1).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].username, "alice");
    }

    #[tokio::test]
    async fn test_delete_post() {
        let post = create_test_post(1, 2, 3);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        repo.delete(post).await.unwrap();
    }
}

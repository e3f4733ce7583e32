//! Comment repository.

use std::sync::Arc;

use crate::entities::{Post, comment, post};
use cinelog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, Set, Statement, TransactionTrait, sea_query::Expr,
};

/// A comment joined with its author.
#[derive(Debug, Clone, FromQueryResult)]
pub struct CommentWithAuthorRow {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub username: String,
    pub author_name: Option<String>,
}

const COMMENT_WITH_AUTHOR: &str = r#"
    SELECT c.id, c.post_id, c.user_id, c.content, c.created_at,
           u.username, u.name AS author_name
    FROM comment c
    JOIN "user" u ON u.id = c.user_id
"#;

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Comments under a post in chronological reading order, with author
    /// info.
    pub async fn find_for_post(&self, post_id: i32) -> AppResult<Vec<CommentWithAuthorRow>> {
        let sql = format!("{COMMENT_WITH_AUTHOR} WHERE c.post_id = $1 ORDER BY c.created_at ASC");

        CommentWithAuthorRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            [post_id.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A single comment with author info.
    pub async fn find_with_author(
        &self,
        comment_id: i32,
    ) -> AppResult<Option<CommentWithAuthorRow>> {
        let sql = format!("{COMMENT_WITH_AUTHOR} WHERE c.id = $1");

        CommentWithAuthorRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            [comment_id.into()],
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a comment and bump the parent post's denormalized
    /// `comment_count` in one transaction, so the counter can never drift
    /// from the comment rows.
    pub async fn create(
        &self,
        post_id: i32,
        user_id: i32,
        content: &str,
    ) -> AppResult<comment::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let model = comment::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
            content: Set(content.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Post::update_many()
            .col_expr(
                post::Column::CommentCount,
                Expr::col(post::Column::CommentCount).add(1),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn create_test_comment(id: i32, post_id: i32, user_id: i32) -> comment::Model {
        comment::Model {
            id,
            post_id,
            user_id,
            content: "Agreed".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_for_post_rows() {
        let row = btreemap! {
            "id" => Value::from(1),
            "post_id" => Value::from(5),
            "user_id" => Value::from(2),
            "content" => Value::from("Agreed"),
            "created_at" => Value::from(Utc::now().fixed_offset()),
            "username" => Value::from("bob"),
            "author_name" => Value::from("Bob"),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_for_post(5).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].username, "bob");
    }

    #[tokio::test]
    async fn test_create_inserts_and_bumps_counter() {
        let created = create_test_comment(1, 5, 2);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.create(5, 2, "Agreed").await.unwrap();

        assert_eq!(result.post_id, 5);
        assert_eq!(result.content, "Agreed");
    }
}

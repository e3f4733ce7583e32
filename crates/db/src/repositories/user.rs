//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use cinelog_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::user::Role;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: i32, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            name: Some("Test User".to_string()),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::User,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user(1, "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert_eq!(result.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_find_by_username_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_username("nobody").await.unwrap();

        assert!(result.is_none());
    }
}

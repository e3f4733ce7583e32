//! User service.

use cinelog_common::{AppError, AppResult};
use cinelog_db::{
    entities::user,
    repositories::{SessionRepository, UserRepository},
};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    session_repo: SessionRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, session_repo: SessionRepository) -> Self {
        Self {
            user_repo,
            session_repo,
        }
    }

    /// Resolve a session cookie token to its user.
    ///
    /// Sessions are issued by the external auth service; this side only
    /// validates that the token exists and has not expired.
    pub async fn authenticate_by_session(&self, token: &str) -> AppResult<user::Model> {
        let session = self
            .session_repo
            .find_valid(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: i32) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use cinelog_db::entities::{session, user::Role};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: i32, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            name: None,
            password_hash: "$argon2id$stub".to_string(),
            role: Role::User,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_session(token: &str, user_id: i32) -> session::Model {
        session::Model {
            token: token.to_string(),
            user_id,
            expires_at: (Utc::now() + Duration::days(7)).into(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_by_session_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(1, "alice")]])
                .into_connection(),
        );
        let session_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_session("tok-1", 1)]])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(user_db),
            SessionRepository::new(session_db),
        );

        let user = service.authenticate_by_session("tok-1").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_by_session_invalid_token() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let session_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<session::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(user_db),
            SessionRepository::new(session_db),
        );

        let result = service.authenticate_by_session("stale").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}

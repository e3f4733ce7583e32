//! Session repository.

use std::sync::Arc;

use crate::entities::{Session, session};
use cinelog_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Session repository for database operations.
///
/// Sessions are written by the external auth service; this side only reads
/// and expires them.
#[derive(Clone)]
pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an unexpired session by token.
    pub async fn find_valid(&self, token: &str) -> AppResult<Option<session::Model>> {
        let now = chrono::Utc::now();

        Session::find_by_id(token)
            .filter(session::Column::ExpiresAt.gt(now))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all expired sessions.
    pub async fn delete_expired(&self) -> AppResult<u64> {
        let now = chrono::Utc::now();

        let result = Session::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_valid_found() {
        let session = session::Model {
            token: "tok-1".to_string(),
            user_id: 1,
            expires_at: (Utc::now() + Duration::days(7)).into(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session.clone()]])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        let result = repo.find_valid("tok-1").await.unwrap();

        assert_eq!(result.unwrap().user_id, 1);
    }

    #[tokio::test]
    async fn test_find_valid_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<session::Model>::new()])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        let result = repo.find_valid("unknown").await.unwrap();

        assert!(result.is_none());
    }
}

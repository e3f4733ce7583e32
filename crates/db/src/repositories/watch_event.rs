//! Watch event repository.

use std::sync::Arc;

use crate::entities::{WatchEvent, watch_event};
use cinelog_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

/// Watch event repository for database operations.
#[derive(Clone)]
pub struct WatchEventRepository {
    db: Arc<DatabaseConnection>,
}

impl WatchEventRepository {
    /// Create a new watch event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Number of events a user hosts that have not happened yet.
    pub async fn count_upcoming_hosted(&self, user_id: i32) -> AppResult<u64> {
        let now = chrono::Utc::now();

        WatchEvent::find()
            .filter(watch_event::Column::HostId.eq(user_id))
            .filter(watch_event::Column::EventDateTime.gte(now))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

//! Friend repository.

use std::sync::Arc;

use crate::entities::{Friend, friend};
use cinelog_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

/// Friend repository for database operations.
///
/// Friendship rows are symmetric; a user may appear on either side.
#[derive(Clone)]
pub struct FriendRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendRepository {
    /// Create a new friend repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn either_side(user_id: i32) -> Condition {
        Condition::any()
            .add(friend::Column::UserA.eq(user_id))
            .add(friend::Column::UserB.eq(user_id))
    }

    /// IDs of a user's friends.
    pub async fn friend_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        let rows = Friend::find()
            .filter(Self::either_side(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                if row.user_a == user_id {
                    row.user_b
                } else {
                    row.user_a
                }
            })
            .collect())
    }

    /// Number of friends a user has.
    pub async fn count_for_user(&self, user_id: i32) -> AppResult<u64> {
        Friend::find()
            .filter(Self::either_side(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

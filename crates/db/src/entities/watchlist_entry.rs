//! Watchlist entry entity (a user's tracked relationship to a movie).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Watch status of a tracked movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    #[sea_orm(string_value = "added")]
    Added,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl WatchStatus {
    /// Parse a status supplied by a client.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "added" => Some(Self::Added),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// The wire representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Completed => "completed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "watchlist_entry")]
pub struct Model {
    /// One row per (user, movie) pair, enforced by the composite key
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_id: i32,

    pub status: WatchStatus,

    pub added_date: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub last_updated: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::Id",
        on_delete = "Cascade"
    )]
    Movie,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_status() {
        assert_eq!(WatchStatus::parse("added"), Some(WatchStatus::Added));
        assert_eq!(
            WatchStatus::parse("completed"),
            Some(WatchStatus::Completed)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert_eq!(WatchStatus::parse("to-watch"), None);
        assert_eq!(WatchStatus::parse(""), None);
        assert_eq!(WatchStatus::parse("Added"), None);
    }
}

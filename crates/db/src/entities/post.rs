//! Post entity (top-level discussion message on a movie page).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// The movie the discussion belongs to
    #[sea_orm(indexed)]
    pub movie_id: i32,

    /// Author user ID
    #[sea_orm(indexed)]
    pub user_id: i32,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Like count (denormalized, kept in sync with `post_like`)
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    /// Comment count (denormalized, kept in sync with `comment`)
    #[sea_orm(default_value = 0)]
    pub comment_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::Id",
        on_delete = "Cascade"
    )]
    Movie,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,

    #[sea_orm(has_many = "super::post_like::Entity")]
    PostLike,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Movie entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub synopsis: Option<String>,

    #[sea_orm(nullable)]
    pub director: Option<String>,

    pub release_year: i32,

    /// Relative poster image path, served by the frontend host
    #[sea_orm(nullable)]
    pub poster_path: Option<String>,

    /// Catalog rating carried over from the import source
    #[sea_orm(column_type = "Double")]
    pub avg_rating: f64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_genre::Entity")]
    MovieGenre,

    #[sea_orm(has_many = "super::watchlist_entry::Entity")]
    WatchlistEntry,

    #[sea_orm(has_many = "super::post::Entity")]
    Post,

    #[sea_orm(has_many = "super::review_rating::Entity")]
    ReviewRating,
}

impl Related<super::movie_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenre.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

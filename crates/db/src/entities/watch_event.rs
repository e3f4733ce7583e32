//! Watch event entity (a hosted movie-watching get-together).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "watch_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Hosting user
    #[sea_orm(indexed)]
    pub host_id: i32,

    #[sea_orm(nullable)]
    pub movie_id: Option<i32>,

    pub title: String,

    pub event_date_time: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::HostId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Host,

    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::Id",
        on_delete = "SetNull"
    )]
    Movie,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Friend entity.
//!
//! A row is a confirmed, symmetric friendship; there is no pending state.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friend")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_a: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub user_b: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserA",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    UserA,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserB",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    UserB,
}

impl ActiveModelBehavior for ActiveModel {}

//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260110_000001_create_user_table;
mod m20260110_000002_create_session_table;
mod m20260110_000003_create_catalog_tables;
mod m20260110_000004_create_watchlist_table;
mod m20260110_000005_create_post_table;
mod m20260110_000006_create_comment_table;
mod m20260110_000007_create_post_like_table;
mod m20260110_000008_create_friend_table;
mod m20260110_000009_create_watch_event_table;
mod m20260110_000010_create_review_rating_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_create_user_table::Migration),
            Box::new(m20260110_000002_create_session_table::Migration),
            Box::new(m20260110_000003_create_catalog_tables::Migration),
            Box::new(m20260110_000004_create_watchlist_table::Migration),
            Box::new(m20260110_000005_create_post_table::Migration),
            Box::new(m20260110_000006_create_comment_table::Migration),
            Box::new(m20260110_000007_create_post_like_table::Migration),
            Box::new(m20260110_000008_create_friend_table::Migration),
            Box::new(m20260110_000009_create_watch_event_table::Migration),
            Box::new(m20260110_000010_create_review_rating_table::Migration),
        ]
    }
}

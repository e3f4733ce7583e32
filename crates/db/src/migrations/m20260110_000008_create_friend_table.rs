//! Create friend table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Friend::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Friend::UserA).integer().not_null())
                    .col(ColumnDef::new(Friend::UserB).integer().not_null())
                    .primary_key(Index::create().col(Friend::UserA).col(Friend::UserB))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friend_user_a")
                            .from(Friend::Table, Friend::UserA)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friend_user_b")
                            .from(Friend::Table, Friend::UserB)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_b (friendship rows are looked up from either side)
        manager
            .create_index(
                Index::create()
                    .name("idx_friend_user_b")
                    .table(Friend::Table)
                    .col(Friend::UserB)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Friend::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Friend {
    Table,
    UserA,
    UserB,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

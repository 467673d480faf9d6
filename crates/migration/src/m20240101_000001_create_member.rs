//! Create `member` table.
//!
//! Members own posts; `status` is the ACTIVE/INACTIVE soft-delete flag.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(uuid(Member::Id).primary_key())
                    .col(string_len(Member::Email, 255).unique_key().not_null())
                    .col(string_len(Member::Nickname, 64).not_null())
                    .col(string_len(Member::Status, 16).not_null().default("ACTIVE"))
                    .col(timestamp_with_time_zone(Member::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Member::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Member::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Member { Table, Id, Email, Nickname, Status, CreatedAt, UpdatedAt }

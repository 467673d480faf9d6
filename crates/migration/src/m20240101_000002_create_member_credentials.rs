//! Create `member_credentials` table with FK to `member`.
//! One row per member holding the password hash.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MemberCredentials::Table)
                    .if_not_exists()
                    .col(uuid(MemberCredentials::Id).primary_key())
                    .col(uuid(MemberCredentials::MemberId).unique_key().not_null())
                    .col(string_len(MemberCredentials::PasswordHash, 255).not_null())
                    .col(string_len(MemberCredentials::PasswordAlgorithm, 32).not_null())
                    .col(timestamp_with_time_zone(MemberCredentials::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(MemberCredentials::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_credentials_member")
                            .from(MemberCredentials::Table, MemberCredentials::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MemberCredentials::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MemberCredentials { Table, Id, MemberId, PasswordHash, PasswordAlgorithm, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Member { Table, Id }

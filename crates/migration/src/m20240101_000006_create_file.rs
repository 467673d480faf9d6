//! Create `file` table with FK to `post`.
//!
//! Rows hold upload metadata; bytes live in the storage directory under `stored_name`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(File::Table)
                    .if_not_exists()
                    .col(uuid(File::Id).primary_key())
                    .col(uuid(File::PostId).not_null())
                    .col(string_len(File::OriginalName, 255).not_null())
                    .col(string_len(File::StoredName, 128).unique_key().not_null())
                    .col(string_len(File::ContentType, 128).not_null())
                    .col(big_integer(File::SizeBytes).not_null())
                    .col(string_len(File::Status, 16).not_null().default("ACTIVE"))
                    .col(timestamp_with_time_zone(File::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(File::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_post")
                            .from(File::Table, File::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(File::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum File { Table, Id, PostId, OriginalName, StoredName, ContentType, SizeBytes, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Post { Table, Id }

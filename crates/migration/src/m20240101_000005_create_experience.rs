//! Create `experience` table with FK to `post`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Experience::Table)
                    .if_not_exists()
                    .col(uuid(Experience::Id).primary_key())
                    .col(uuid(Experience::PostId).not_null())
                    .col(string_len(Experience::Title, 255).not_null())
                    .col(text(Experience::Content).not_null())
                    .col(string_len(Experience::Status, 16).not_null().default("ACTIVE"))
                    .col(timestamp_with_time_zone(Experience::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Experience::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_experience_post")
                            .from(Experience::Table, Experience::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Experience::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Experience { Table, Id, PostId, Title, Content, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Post { Table, Id }

//! Create `tag` table with FKs to `post` and `member`.
//! One row per (post, type, name); names are searched by value.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(uuid(Tag::Id).primary_key())
                    .col(uuid(Tag::PostId).not_null())
                    .col(uuid(Tag::MemberId).not_null())
                    .col(string_len(Tag::TagType, 16).not_null())
                    .col(string_len(Tag::TagName, 64).not_null())
                    .col(string_len(Tag::Status, 16).not_null().default("ACTIVE"))
                    .col(timestamp_with_time_zone(Tag::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Tag::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_post")
                            .from(Tag::Table, Tag::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_member")
                            .from(Tag::Table, Tag::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tag::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Tag { Table, Id, PostId, MemberId, TagType, TagName, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Post { Table, Id }

#[derive(DeriveIden)]
enum Member { Table, Id }

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Post listing: (member_id, status, created_at)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_post_member_status_created")
                    .table(Post::Table)
                    .col(Post::MemberId)
                    .col(Post::Status)
                    .col(Post::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Tag: lookups by post and search by (member_id, tag_name)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tag_post")
                    .table(Tag::Table)
                    .col(Tag::PostId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tag_member_name")
                    .table(Tag::Table)
                    .col(Tag::MemberId)
                    .col(Tag::TagName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_experience_post")
                    .table(Experience::Table)
                    .col(Experience::PostId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_file_post")
                    .table(File::Table)
                    .col(File::PostId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_post_member_status_created").table(Post::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tag_post").table(Tag::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tag_member_name").table(Tag::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_experience_post").table(Experience::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_file_post").table(File::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Post { Table, MemberId, Status, CreatedAt }

#[derive(DeriveIden)]
enum Tag { Table, PostId, MemberId, TagName }

#[derive(DeriveIden)]
enum Experience { Table, PostId }

#[derive(DeriveIden)]
enum File { Table, PostId }

use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, TransactionTrait};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use common::pagination::Pagination;
use models::{post, BaseStatus};

use super::dto::{
    CreatePostRequest, CreatePostResponse, DeletePostResponse, GetPagePostsResponse, GetPostResponse,
    GetPostsResponse, OrderType, RestorePostResponse, UpdatePostRequest, UpdatePostResponse,
};
use super::repository::{self, PostSort};
use crate::errors::ServiceError;
use crate::experience;
use crate::file::{FileService, UploadFile};
use crate::member::LoginMember;
use crate::tag;

/// Post aggregate operations. Every write runs in one explicit transaction.
#[derive(Clone)]
pub struct PostService {
    db: Arc<DatabaseConnection>,
    files: FileService,
}

async fn find_post<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<post::Model, ServiceError> {
    post::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("post"))
}

/// Trimmed, non-blank, first-seen-order unique names.
fn normalize_tag_names(tag_names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tag_names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.to_string()))
        .map(str::to_string)
        .collect()
}

impl PostService {
    pub fn new(db: Arc<DatabaseConnection>, files: FileService) -> Self { Self { db, files } }

    pub fn files(&self) -> &FileService { &self.files }

    #[instrument(skip(self, member, req, files), fields(member_id = %member.id, files = files.len()))]
    pub async fn create_post(
        &self,
        member: &LoginMember,
        req: CreatePostRequest,
        files: Vec<UploadFile>,
    ) -> Result<CreatePostResponse, ServiceError> {
        let txn = self.db.begin().await?;
        let created = post::create(&txn, member.id, &req.title, req.begin_at, req.finish_at).await?;
        if !req.tags.is_empty() {
            tag::create_tag(&txn, created.id, &req.tags, member.id).await?;
        }
        if !req.experiences.is_empty() {
            experience::create_experiences(&txn, created.id, &req.experiences).await?;
        }
        let mut stored = Vec::new();
        if !files.is_empty() {
            let rows = self.files.upload_files(&txn, created.id, &files).await?;
            stored = rows.into_iter().map(|f| f.stored_name).collect();
        }
        if let Err(e) = txn.commit().await {
            self.files.remove_stored(&stored).await;
            return Err(e.into());
        }
        info!(post_id = %created.id, event = "post_created", "post created");
        Ok(CreatePostResponse::of(created.id))
    }

    #[instrument(skip(self, member, req), fields(member_id = %member.id, post_id = %post_id))]
    pub async fn update_post(
        &self,
        member: &LoginMember,
        post_id: Uuid,
        req: UpdatePostRequest,
    ) -> Result<UpdatePostResponse, ServiceError> {
        let txn = self.db.begin().await?;
        let found = find_post(&txn, post_id).await?;
        if !found.is_owned_by(member.id) {
            return Err(ServiceError::not_owner("post"));
        }
        if !found.status.is_active() {
            return Err(ServiceError::inactive("post"));
        }
        let updated = post::update_content(&txn, found, &req.title, req.begin_at, req.finish_at).await?;
        tag::update_tags(&txn, updated.id, &req.tags, member.id).await?;
        txn.commit().await?;
        info!(post_id = %updated.id, event = "post_updated", "post updated");
        Ok(UpdatePostResponse::of(updated.id))
    }

    /// Soft delete. A non-owner gets `post_id: None` and nothing changes.
    #[instrument(skip(self, member), fields(member_id = %member.id, post_id = %post_id))]
    pub async fn delete_post(&self, member: &LoginMember, post_id: Uuid) -> Result<DeletePostResponse, ServiceError> {
        let txn = self.db.begin().await?;
        let found = find_post(&txn, post_id).await?;
        if !found.is_owned_by(member.id) {
            warn!(post_id = %post_id, event = "post_delete_ignored", "not the owner");
            return Ok(DeletePostResponse::of(None));
        }
        experience::soft_delete_experiences(&txn, post_id).await?;
        tag::soft_delete_tags(&txn, post_id).await?;
        self.files.soft_delete_files(&txn, post_id).await?;
        post::set_status(&txn, found, BaseStatus::Inactive).await?;
        txn.commit().await?;
        info!(post_id = %post_id, event = "post_soft_deleted", "post soft deleted");
        Ok(DeletePostResponse::of(Some(post_id)))
    }

    #[instrument(skip(self, member), fields(member_id = %member.id, post_id = %post_id))]
    pub async fn get_post(&self, member: &LoginMember, post_id: Uuid) -> Result<GetPostResponse, ServiceError> {
        let found = find_post(self.db.as_ref(), post_id).await?;
        if !found.status.is_active() {
            return Err(ServiceError::inactive("post"));
        }
        if !found.is_owned_by(member.id) {
            return Err(ServiceError::not_owner("post"));
        }
        let experiences = experience::get_experiences(self.db.as_ref(), post_id).await?;
        let tags = tag::get_tags(self.db.as_ref(), post_id).await?;
        let files = self.files.get_files(self.db.as_ref(), post_id).await?;
        Ok(GetPostResponse {
            post_id: found.id,
            title: found.title,
            begin_at: found.begin_at,
            finish_at: found.finish_at,
            experiences,
            tags,
            files,
        })
    }

    async fn to_page(
        &self,
        member: &LoginMember,
        rows: Vec<post::Model>,
        total: u64,
        page: Pagination,
    ) -> Result<GetPagePostsResponse, ServiceError> {
        let ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
        let mut names = tag::find_tag_names_by_posts(self.db.as_ref(), member.id, &ids).await?;
        let posts = rows
            .into_iter()
            .map(|p| {
                let tag_names = names.remove(&p.id).unwrap_or_default();
                GetPostsResponse::of(p, tag_names)
            })
            .collect();
        Ok(GetPagePostsResponse { posts, total_pages: page.total_pages(total), total_posts: total })
    }

    /// The member's active posts.
    pub async fn get_all_posts_with_paging(
        &self,
        member: &LoginMember,
        order: OrderType,
        page: Pagination,
    ) -> Result<GetPagePostsResponse, ServiceError> {
        let (rows, total) =
            repository::find_page_by_member(self.db.as_ref(), member.id, BaseStatus::Active, PostSort::Created(order), page).await?;
        self.to_page(member, rows, total, page).await
    }

    /// The member's soft-deleted posts, most recently removed first.
    pub async fn get_all_removed_posts_with_paging(
        &self,
        member: &LoginMember,
        page: Pagination,
    ) -> Result<GetPagePostsResponse, ServiceError> {
        let (rows, total) =
            repository::find_page_by_member(self.db.as_ref(), member.id, BaseStatus::Inactive, PostSort::RecentlyUpdated, page)
                .await?;
        self.to_page(member, rows, total, page).await
    }

    #[instrument(skip(self, member), fields(member_id = %member.id))]
    pub async fn find_posts_by_tag_names(
        &self,
        member: &LoginMember,
        tag_names: &[String],
        order: OrderType,
        page: Pagination,
    ) -> Result<GetPagePostsResponse, ServiceError> {
        let names = normalize_tag_names(tag_names);
        if names.is_empty() {
            return Ok(GetPagePostsResponse::default());
        }
        let (rows, total) = repository::find_page_by_tag_names(self.db.as_ref(), member.id, &names, order, page).await?;
        self.to_page(member, rows, total, page).await
    }

    /// Remove the post and its children for good; returns whether anything was deleted.
    #[instrument(skip(self, member), fields(member_id = %member.id, post_id = %post_id))]
    pub async fn hard_delete_post(&self, member: &LoginMember, post_id: Uuid) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        let found = find_post(&txn, post_id).await?;
        if !found.is_owned_by(member.id) {
            warn!(post_id = %post_id, event = "post_hard_delete_ignored", "not the owner");
            return Ok(false);
        }
        experience::hard_delete_experiences(&txn, post_id).await?;
        tag::hard_delete_tags(&txn, post_id).await?;
        let stored = self.files.hard_delete_files(&txn, post_id).await?;
        post::hard_delete(&txn, post_id).await?;
        txn.commit().await?;
        self.files.remove_stored(&stored).await;
        info!(post_id = %post_id, event = "post_hard_deleted", "post hard deleted");
        Ok(true)
    }

    /// Restore a soft-deleted post. A non-owner gets `post_id: None` and nothing changes.
    #[instrument(skip(self, member), fields(member_id = %member.id, post_id = %post_id))]
    pub async fn update_post_active(&self, member: &LoginMember, post_id: Uuid) -> Result<RestorePostResponse, ServiceError> {
        let txn = self.db.begin().await?;
        let found = find_post(&txn, post_id).await?;
        if !found.is_owned_by(member.id) {
            warn!(post_id = %post_id, event = "post_restore_ignored", "not the owner");
            return Ok(RestorePostResponse::of(None));
        }
        post::set_status(&txn, found, BaseStatus::Active).await?;
        tag::update_tag_active(&txn, post_id).await?;
        self.files.update_file_active(&txn, post_id).await?;
        experience::update_experience_active(&txn, post_id).await?;
        txn.commit().await?;
        info!(post_id = %post_id, event = "post_restored", "post restored");
        Ok(RestorePostResponse::of(Some(post_id)))
    }
}

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use common::pagination::Pagination;
use service::errors::ErrorCode;
use service::file::UploadFile;
use service::post::{
    CreatePostRequest, CreatePostResponse, DeletePostResponse, GetPagePostsResponse, GetPostResponse, OrderType,
    RestorePostResponse, UpdatePostRequest, UpdatePostResponse,
};

use crate::errors::ApiError;
use crate::extract::CurrentMember;
use crate::observability::{
    FILES_UPLOADED_TOTAL, POSTS_CREATED_TOTAL, POSTS_HARD_DELETED_TOTAL, POSTS_RESTORED_TOTAL, POSTS_SOFT_DELETED_TOTAL,
};
use crate::routes::auth::ServerState;

/// Multipart part holding the JSON [`CreatePostRequest`].
pub const POST_PART: &str = "post";
/// Multipart part(s) holding uploaded files.
pub const FILES_PART: &str = "files";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub order: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// comma separated tag names
    pub tags: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn pagination(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    let d = Pagination::default();
    Pagination::new(page.unwrap_or(d.page), per_page.unwrap_or(d.per_page))
}

fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body-limit rejections keep their 413; anything else is a malformed form.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(ErrorCode::PayloadTooLarge, e.body_text())
    } else {
        ApiError::bad_request(format!("invalid multipart body: {}", e.body_text()))
    }
}

async fn read_create_form(mut multipart: Multipart) -> Result<(CreatePostRequest, Vec<UploadFile>), ApiError> {
    let mut post: Option<CreatePostRequest> = None;
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(POST_PART) => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                let req = serde_json::from_slice(&bytes)
                    .map_err(|e| ApiError::bad_request(format!("invalid post part: {e}")))?;
                post = Some(req);
            }
            Some(FILES_PART) => {
                if files.len() == super::MAX_FILES_PER_POST {
                    return Err(ApiError::bad_request(format!(
                        "at most {} files per post",
                        super::MAX_FILES_PER_POST
                    )));
                }
                let file_name = field.file_name().unwrap_or("file").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                files.push(UploadFile { file_name, content_type, bytes: bytes.to_vec() });
            }
            other => debug!(part = ?other, "ignoring multipart part"),
        }
    }
    let post = post.ok_or_else(|| ApiError::bad_request(format!("missing `{POST_PART}` part")))?;
    Ok((post, files))
}

#[utoipa::path(post, path = "/api/posts", tag = "posts", request_body(content = crate::openapi::CreatePostForm, content_type = "multipart/form-data"), responses((status = 201, description = "Created", body = crate::openapi::PostIdDoc), (status = 400, description = "Bad Request"), (status = 413, description = "File too large")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePostResponse>), ApiError> {
    let (req, files) = read_create_form(multipart).await?;
    let file_count = files.len() as u64;
    let out = state.posts.create_post(&member, req, files).await?;
    POSTS_CREATED_TOTAL.inc();
    FILES_UPLOADED_TOTAL.inc_by(file_count);
    Ok((StatusCode::CREATED, Json(out)))
}

#[utoipa::path(get, path = "/api/posts", tag = "posts", params(("order" = Option<String>, Query, description = "newest | oldest"), ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)), responses((status = 200, description = "Active posts", body = crate::openapi::PagePostsDoc)))]
pub async fn list(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Query(params): Query<ListParams>,
) -> Result<Json<GetPagePostsResponse>, ApiError> {
    let order = OrderType::from_param(params.order.as_deref());
    let out = state
        .posts
        .get_all_posts_with_paging(&member, order, pagination(params.page, params.per_page))
        .await?;
    Ok(Json(out))
}

#[utoipa::path(get, path = "/api/posts/removed", tag = "posts", params(("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)), responses((status = 200, description = "Removed posts", body = crate::openapi::PagePostsDoc)))]
pub async fn list_removed(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Query(params): Query<ListParams>,
) -> Result<Json<GetPagePostsResponse>, ApiError> {
    let out = state
        .posts
        .get_all_removed_posts_with_paging(&member, pagination(params.page, params.per_page))
        .await?;
    Ok(Json(out))
}

#[utoipa::path(get, path = "/api/posts/search", tag = "posts", params(("tags" = Option<String>, Query, description = "comma separated tag names"), ("order" = Option<String>, Query,), ("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)), responses((status = 200, description = "Posts with any of the tags", body = crate::openapi::PagePostsDoc)))]
pub async fn search(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Query(params): Query<SearchParams>,
) -> Result<Json<GetPagePostsResponse>, ApiError> {
    let tags = split_tags(params.tags.as_deref());
    let order = OrderType::from_param(params.order.as_deref());
    let out = state
        .posts
        .find_posts_by_tag_names(&member, &tags, order, pagination(params.page, params.per_page))
        .await?;
    Ok(Json(out))
}

#[utoipa::path(get, path = "/api/posts/{id}", tag = "posts", params(("id" = Uuid, Path,)), responses((status = 200, description = "Post detail", body = crate::openapi::PostDetailDoc), (status = 400, description = "Not the owner"), (status = 404, description = "Not Found"), (status = 405, description = "Post removed")))]
pub async fn get(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<Uuid>,
) -> Result<Json<GetPostResponse>, ApiError> {
    Ok(Json(state.posts.get_post(&member, id).await?))
}

#[utoipa::path(patch, path = "/api/posts/{id}", tag = "posts", params(("id" = Uuid, Path,)), request_body = crate::openapi::UpdatePostDoc, responses((status = 200, description = "Updated", body = crate::openapi::PostIdDoc), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<UpdatePostResponse>, ApiError> {
    Ok(Json(state.posts.update_post(&member, id, req).await?))
}

#[utoipa::path(delete, path = "/api/posts/{id}", tag = "posts", params(("id" = Uuid, Path,)), responses((status = 200, description = "Soft deleted; post_id is null when not the owner", body = crate::openapi::OptionalPostIdDoc), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletePostResponse>, ApiError> {
    let out = state.posts.delete_post(&member, id).await?;
    if out.post_id.is_some() {
        POSTS_SOFT_DELETED_TOTAL.inc();
    }
    Ok(Json(out))
}

#[utoipa::path(patch, path = "/api/posts/{id}/restore", tag = "posts", params(("id" = Uuid, Path,)), responses((status = 200, description = "Restored; post_id is null when not the owner", body = crate::openapi::OptionalPostIdDoc), (status = 404, description = "Not Found")))]
pub async fn restore(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<Uuid>,
) -> Result<Json<RestorePostResponse>, ApiError> {
    let out = state.posts.update_post_active(&member, id).await?;
    if out.post_id.is_some() {
        POSTS_RESTORED_TOTAL.inc();
    }
    Ok(Json(out))
}

#[utoipa::path(delete, path = "/api/posts/{id}/hard", tag = "posts", params(("id" = Uuid, Path,)), responses((status = 204, description = "Deleted (no-op when not the owner)"), (status = 404, description = "Not Found")))]
pub async fn hard_delete(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.posts.hard_delete_post(&member, id).await? {
        POSTS_HARD_DELETED_TOTAL.inc();
    }
    Ok(StatusCode::NO_CONTENT)
}

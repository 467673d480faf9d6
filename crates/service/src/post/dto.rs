use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::experience::{CreateExperienceRequest, GetExperienceResponse};
use crate::file::GetFileResponse;
use crate::tag::{CreateTagRequest, FindTagResponse};

/// Listing order by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Newest,
    Oldest,
}

impl OrderType {
    /// Case-insensitive; anything unrecognised falls back to newest.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "oldest" => OrderType::Oldest,
            _ => OrderType::Newest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub begin_at: NaiveDate,
    pub finish_at: NaiveDate,
    #[serde(default)]
    pub tags: Vec<CreateTagRequest>,
    #[serde(default)]
    pub experiences: Vec<CreateExperienceRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub begin_at: NaiveDate,
    pub finish_at: NaiveDate,
    #[serde(default)]
    pub tags: Vec<CreateTagRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub post_id: Uuid,
}

impl CreatePostResponse {
    pub fn of(post_id: Uuid) -> Self { Self { post_id } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePostResponse {
    pub post_id: Uuid,
}

impl UpdatePostResponse {
    pub fn of(post_id: Uuid) -> Self { Self { post_id } }
}

/// `post_id` is `None` when the caller did not own the post and nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePostResponse {
    pub post_id: Option<Uuid>,
}

impl DeletePostResponse {
    pub fn of(post_id: Option<Uuid>) -> Self { Self { post_id } }
}

/// Same shape as [`DeletePostResponse`], for restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestorePostResponse {
    pub post_id: Option<Uuid>,
}

impl RestorePostResponse {
    pub fn of(post_id: Option<Uuid>) -> Self { Self { post_id } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetPostResponse {
    pub post_id: Uuid,
    pub title: String,
    pub begin_at: NaiveDate,
    pub finish_at: NaiveDate,
    pub experiences: Vec<GetExperienceResponse>,
    pub tags: Vec<FindTagResponse>,
    pub files: Vec<GetFileResponse>,
}

/// One row of a paged listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetPostsResponse {
    pub post_id: Uuid,
    pub title: String,
    pub begin_at: NaiveDate,
    pub finish_at: NaiveDate,
    pub tag_names: Vec<String>,
}

impl GetPostsResponse {
    pub fn of(post: models::post::Model, tag_names: Vec<String>) -> Self {
        Self { post_id: post.id, title: post.title, begin_at: post.begin_at, finish_at: post.finish_at, tag_names }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetPagePostsResponse {
    pub posts: Vec<GetPostsResponse>,
    pub total_pages: u64,
    pub total_posts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_param_falls_back_to_newest() {
        assert_eq!(OrderType::from_param(None), OrderType::Newest);
        assert_eq!(OrderType::from_param(Some("newest")), OrderType::Newest);
        assert_eq!(OrderType::from_param(Some("OLDEST")), OrderType::Oldest);
        assert_eq!(OrderType::from_param(Some("sideways")), OrderType::Newest);
    }

    #[test]
    fn create_request_children_default_to_empty() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title":"Jeju","begin_at":"2024-05-01","finish_at":"2024-05-03"}"#).unwrap();
        assert!(req.tags.is_empty());
        assert!(req.experiences.is_empty());
        assert_eq!(req.begin_at, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn delete_response_serializes_null_for_noop() {
        let json = serde_json::to_string(&DeletePostResponse::of(None)).unwrap();
        assert_eq!(json, r#"{"post_id":null}"#);
    }
}

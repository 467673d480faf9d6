use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::tag::TagType;

/// Tags of one type to attach to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub tag_type: TagType,
    #[serde(default)]
    pub tag_name: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindTagResponse {
    pub tag_type: TagType,
    pub tag_name: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTagResponse {
    pub tag_ids: Vec<Uuid>,
}

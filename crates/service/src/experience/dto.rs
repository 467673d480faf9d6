use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateExperienceRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateExperienceRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetExperienceResponse {
    pub experience_id: Uuid,
    pub title: String,
    pub content: String,
}

impl From<models::experience::Model> for GetExperienceResponse {
    fn from(m: models::experience::Model) -> Self {
        Self { experience_id: m.id, title: m.title, content: m.content }
    }
}

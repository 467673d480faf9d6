use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One uploaded part as received from the client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetFileResponse {
    pub file_id: Uuid,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub url: String,
}

impl From<models::file::Model> for GetFileResponse {
    fn from(m: models::file::Model) -> Self {
        Self {
            url: format!("/api/files/{}", m.id),
            file_id: m.id,
            original_name: m.original_name,
            content_type: m.content_type,
            size_bytes: m.size_bytes,
        }
    }
}

/// Metadata plus content, returned by a download.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub meta: GetFileResponse,
    pub bytes: Vec<u8>,
}

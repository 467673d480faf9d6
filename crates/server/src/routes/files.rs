use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::CurrentMember;
use crate::routes::auth::ServerState;

/// `inline; filename="..."`, dropping characters that cannot sit in a quoted header value.
fn content_disposition(original_name: &str) -> HeaderValue {
    let safe: String = original_name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"' && *c != '\\')
        .collect();
    HeaderValue::from_str(&format!("inline; filename=\"{safe}\"")).unwrap_or_else(|_| HeaderValue::from_static("inline"))
}

#[utoipa::path(get, path = "/api/files/{id}", tag = "files", params(("id" = Uuid, Path,)), responses((status = 200, description = "File bytes"), (status = 400, description = "Not the owner"), (status = 404, description = "Not Found"), (status = 405, description = "File removed")))]
pub async fn download(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<Uuid>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let file = state.files().download(state.db.as_ref(), member.id, id).await?;
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&file.meta.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_DISPOSITION, content_disposition(&file.meta.original_name));
    Ok((headers, file.bytes))
}
